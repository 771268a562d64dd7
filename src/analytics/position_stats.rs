// src/analytics/position_stats.rs
use super::trade_stats::TradeStats;
use crate::types::{Position, TpTarget};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionStats {
    pub open_count: usize,
    pub closed: TradeStats,
    pub net_pnl: Decimal,
}

impl PositionStats {
    /// Only closed positions enter the win/loss math, and `is_win` decides
    /// the side of the ledger even when `total_pnl` says otherwise.
    pub fn calculate(positions: &[Position]) -> Self {
        let mut stats = Self::default();
        let mut gross_win = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;

        for position in positions {
            if !position.is_closed {
                stats.open_count += 1;
                continue;
            }

            let closed = &mut stats.closed;
            closed.total += 1;
            closed.total_pnl += position.total_pnl;
            closed.total_fees += position.total_fees;
            stats.net_pnl += position.net_pnl;

            if position.is_win {
                closed.win_count += 1;
                gross_win += position.total_pnl;
            } else {
                closed.loss_count += 1;
                gross_loss += position.total_pnl;
            }
        }

        stats.closed.finish(gross_win, gross_loss);
        stats
    }
}

/// Fill state of one take-profit target, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TpProgress {
    pub sort_order: i32,
    pub label: String,
    pub price: Decimal,
    pub ratio: Decimal,
    pub hit: bool,
    /// `filled_qty / target_qty`, zero for a zero-sized target.
    pub fill_ratio: Decimal,
}

impl From<&TpTarget> for TpProgress {
    fn from(target: &TpTarget) -> Self {
        let fill_ratio = if target.target_qty.is_zero() {
            Decimal::ZERO
        } else {
            target.filled_qty / target.target_qty
        };
        Self {
            sort_order: target.sort_order,
            label: target
                .label
                .clone()
                .unwrap_or_else(|| format!("TP{}", i64::from(target.sort_order) + 1)),
            price: target.price,
            ratio: target.ratio,
            hit: target.hit,
            fill_ratio,
        }
    }
}

/// Targets ordered by `sort_order`. Duplicate orders keep their given relative order.
pub fn tp_progress(position: &Position) -> Vec<TpProgress> {
    let mut targets: Vec<&TpTarget> = position.tp_targets.iter().collect();
    targets.sort_by_key(|t| t.sort_order);
    targets.into_iter().map(TpProgress::from).collect()
}

/// Progress of every open position, keyed by position id, in the given order.
pub fn open_tp_progress(positions: &[Position]) -> Vec<(String, Vec<TpProgress>)> {
    positions
        .iter()
        .filter(|p| !p.is_closed)
        .map(|p| (p.id.clone(), tp_progress(p)))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    pub(crate) fn position(id: &str, is_closed: bool, is_win: bool, total_pnl: Decimal) -> Position {
        Position {
            id: id.to_string(),
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            qty: dec!(1),
            original_qty: dec!(1),
            entry_price: dec!(100),
            sl: dec!(95),
            tp: dec!(110),
            leverage: dec!(10),
            open_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            is_closed,
            trailing_active: false,
            best_price: dec!(100),
            risk_amount: dec!(5),
            total_pnl,
            total_fees: dec!(1),
            net_pnl: total_pnl - dec!(1),
            trade_count: 2,
            is_win,
            tp_targets: Vec::new(),
        }
    }

    fn target(sort_order: i32, label: Option<&str>, filled: Decimal, hit: bool) -> TpTarget {
        TpTarget {
            sort_order,
            price: dec!(110) + Decimal::from(sort_order),
            ratio: dec!(0.5),
            target_qty: dec!(2),
            filled_qty: filled,
            hit,
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn open_positions_stay_out_of_win_loss() {
        let positions = vec![
            position("a", true, true, dec!(40)),
            position("b", true, false, dec!(-10)),
            position("c", false, false, dec!(999)),
        ];
        let stats = PositionStats::calculate(&positions);

        assert_eq!(stats.open_count, 1);
        assert_eq!(stats.closed.total, 2);
        assert_eq!(stats.closed.win_count, 1);
        assert_eq!(stats.closed.loss_count, 1);
        assert_eq!(stats.closed.win_rate, dec!(50));
        assert_eq!(stats.closed.total_pnl, dec!(30));
        assert_eq!(stats.closed.profit_factor, dec!(4));
        assert_eq!(stats.net_pnl, dec!(28));
    }

    #[test]
    fn win_flag_is_trusted_over_pnl_sign() {
        // Flagged a win with a negative total, passed through unchanged.
        let positions = vec![position("a", true, true, dec!(-5))];
        let stats = PositionStats::calculate(&positions);
        assert_eq!(stats.closed.win_count, 1);
        assert_eq!(stats.closed.loss_count, 0);
        assert_eq!(stats.closed.avg_win, dec!(-5));
        assert!(stats.closed.profit_factor.is_zero());
    }

    #[test]
    fn no_positions() {
        assert_eq!(PositionStats::calculate(&[]), PositionStats::default());
    }

    #[test]
    fn tp_progress_orders_and_keeps_duplicates() {
        let mut pos = position("a", false, false, Decimal::ZERO);
        pos.tp_targets = vec![
            target(1, Some("runner"), dec!(0), false),
            target(0, None, dec!(2), true),
            target(1, None, dec!(1), false),
        ];
        let progress = tp_progress(&pos);

        let orders: Vec<i32> = progress.iter().map(|p| p.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 1]);
        assert_eq!(progress[0].label, "TP1");
        assert!(progress[0].hit);
        assert_eq!(progress[0].fill_ratio, dec!(1));
        assert_eq!(progress[1].label, "runner");
        assert_eq!(progress[2].label, "TP2");
        assert_eq!(progress[2].fill_ratio, dec!(0.5));
    }

    #[test]
    fn default_label_at_extreme_sort_order() {
        assert_eq!(TpProgress::from(&target(i32::MAX, None, dec!(0), false)).label, "TP2147483648");
        assert_eq!(TpProgress::from(&target(-1, None, dec!(0), false)).label, "TP0");
    }

    #[test]
    fn zero_sized_target_has_zero_fill() {
        let mut t = target(0, None, dec!(0), false);
        t.target_qty = Decimal::ZERO;
        assert!(TpProgress::from(&t).fill_ratio.is_zero());
    }

    #[test]
    fn open_progress_skips_closed() {
        let positions = vec![
            position("a", true, true, dec!(1)),
            position("b", false, false, Decimal::ZERO),
        ];
        let progress = open_tp_progress(&positions);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].0, "b");
    }
}
