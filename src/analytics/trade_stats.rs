// src/analytics/trade_stats.rs
use crate::types::Trade;
use rust_decimal::Decimal;
use serde::Serialize;

/// Win/loss summary shared by trade and position statistics.
///
/// Every quotient degrades to zero on an empty or one-sided input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeStats {
    pub total: usize,
    pub total_pnl: Decimal,
    pub total_fees: Decimal,
    pub win_count: usize,
    pub loss_count: usize,
    /// Percentage in `[0, 100]`.
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    /// Negative (or zero when there are no losses).
    pub avg_loss: Decimal,
    pub profit_factor: Decimal,
}

impl TradeStats {
    /// Win/loss on the sign of `pnl`; zero-P&L trades count toward `total` only.
    pub fn calculate(trades: &[Trade]) -> Self {
        let mut stats = Self {
            total: trades.len(),
            ..Self::default()
        };
        let mut gross_win = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;

        for trade in trades {
            stats.total_pnl += trade.pnl;
            stats.total_fees += trade.fees;

            if trade.pnl > Decimal::ZERO {
                stats.win_count += 1;
                gross_win += trade.pnl;
            } else if trade.pnl < Decimal::ZERO {
                stats.loss_count += 1;
                gross_loss += trade.pnl;
            }
        }

        stats.finish(gross_win, gross_loss);
        stats
    }

    /// Fills the derived ratios from counts and gross sums already tallied.
    pub(crate) fn finish(&mut self, gross_win: Decimal, gross_loss: Decimal) {
        self.win_rate = percentage(self.win_count, self.total);
        self.avg_win = mean(gross_win, self.win_count);
        self.avg_loss = mean(gross_loss, self.loss_count);
        self.profit_factor = if self.avg_loss.is_zero() {
            Decimal::ZERO
        } else {
            (self.avg_win / self.avg_loss).abs()
        };
    }
}

pub(crate) fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// `part / whole * 100`, zero when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    pub(crate) fn trade(id: &str, pnl: Decimal, created_at: DateTime<Utc>) -> Trade {
        Trade {
            id: id.to_string(),
            position_id: None,
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            entry_price: dec!(100),
            exit_price: dec!(101),
            qty: dec!(1),
            leverage: dec!(10),
            sl: dec!(95),
            tp: dec!(110),
            pnl,
            pnl_pct: Decimal::ZERO,
            fees: dec!(0.1),
            risk_amount: dec!(5),
            open_time: created_at,
            close_time: None,
            reason: None,
            is_partial: false,
            created_at,
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn mixed_trades_with_a_flat_one() {
        let trades = vec![
            trade("a", dec!(100), at(0)),
            trade("b", dec!(-50), at(1)),
            trade("c", dec!(30), at(2)),
            trade("d", dec!(0), at(3)),
        ];
        let stats = TradeStats::calculate(&trades);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.win_count, 2);
        assert_eq!(stats.loss_count, 1);
        assert_eq!(stats.avg_win, dec!(65));
        assert_eq!(stats.avg_loss, dec!(-50));
        assert_eq!(stats.profit_factor, dec!(1.3));
        assert_eq!(stats.win_rate, dec!(50));
        assert_eq!(stats.total_pnl, dec!(80));
        assert_eq!(stats.total_fees, dec!(0.4));
        assert!(stats.win_count + stats.loss_count <= stats.total);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = TradeStats::calculate(&[]);
        assert_eq!(stats, TradeStats::default());
        assert!(stats.win_rate.is_zero());
        assert!(stats.profit_factor.is_zero());
    }

    #[test]
    fn no_losses_saturates_profit_factor_to_zero() {
        let trades = vec![trade("a", dec!(10), at(0)), trade("b", dec!(20), at(1))];
        let stats = TradeStats::calculate(&trades);
        assert_eq!(stats.avg_win, dec!(15));
        assert!(stats.avg_loss.is_zero());
        assert!(stats.profit_factor.is_zero());
        assert_eq!(stats.win_rate, dec!(100));
    }

    #[test]
    fn only_losses() {
        let trades = vec![trade("a", dec!(-10), at(0)), trade("b", dec!(-30), at(1))];
        let stats = TradeStats::calculate(&trades);
        assert_eq!(stats.win_count, 0);
        assert!(stats.win_rate.is_zero());
        assert_eq!(stats.avg_loss, dec!(-20));
        assert!(stats.profit_factor.is_zero());
    }
}
