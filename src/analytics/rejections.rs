// src/analytics/rejections.rs
use super::trade_stats::percentage;
use crate::types::{EvaluationResult, SignalEvaluation};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionReason {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RejectionBreakdown {
    /// Descending by count, first-seen order among equal counts.
    pub reasons: Vec<RejectionReason>,
    /// Number of rejected evaluations.
    pub total: usize,
    pub signals: usize,
}

impl RejectionBreakdown {
    /// Tallies failing checks of rejected evaluations by condition name.
    ///
    /// Failing checks on signal evaluations are ignored: the other side may
    /// still have signaled.
    pub fn calculate(evaluations: &[SignalEvaluation]) -> Self {
        let mut reasons: Vec<RejectionReason> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut total = 0;

        for evaluation in evaluations {
            if evaluation.result != EvaluationResult::Rejected {
                continue;
            }
            total += 1;

            for check in evaluation.checks.iter().filter(|c| !c.passed) {
                let name = check.condition_name.as_str();
                match index.get(name) {
                    Some(&i) => reasons[i].count += 1,
                    None => {
                        index.insert(name, reasons.len());
                        reasons.push(RejectionReason {
                            name: name.to_string(),
                            count: 1,
                        });
                    }
                }
            }
        }

        // sort_by is stable
        reasons.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            reasons,
            total,
            signals: evaluations.len() - total,
        }
    }

    pub fn top(&self, n: usize) -> &[RejectionReason] {
        &self.reasons[..n.min(self.reasons.len())]
    }

    /// Share of rejected evaluations that failed on this reason.
    pub fn share_pct(&self, reason: &RejectionReason) -> Decimal {
        percentage(reason.count, self.total)
    }

    /// Bar length relative to the most frequent reason.
    pub fn bar_width_pct(&self, reason: &RejectionReason) -> Decimal {
        let max = self.reasons.first().map(|r| r.count).unwrap_or(0);
        percentage(reason.count, max)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{ConditionCheck, Side};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    pub(crate) fn check(side: Side, name: &str, passed: bool) -> ConditionCheck {
        ConditionCheck {
            id: None,
            side,
            condition_name: name.to_string(),
            expected_value: "true".to_string(),
            actual_value: if passed { "true" } else { "false" }.to_string(),
            passed,
        }
    }

    pub(crate) fn evaluation(
        id: &str,
        result: EvaluationResult,
        checks: Vec<ConditionCheck>,
    ) -> SignalEvaluation {
        SignalEvaluation {
            id: id.to_string(),
            symbol: "BTCUSDT".to_string(),
            result,
            close_price: dec!(50000),
            rsi_value: dec!(45.2),
            atr_value: dec!(120.5),
            ema_fast_value: dec!(49950),
            ema_slow_value: dec!(49800),
            checks,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn ranks_descending_with_first_seen_ties() {
        let evaluations = vec![
            evaluation(
                "e1",
                EvaluationResult::Rejected,
                vec![
                    check(Side::Long, "rsi_oversold", false),
                    check(Side::Short, "ema_touch", false),
                    check(Side::Long, "htf_trend", true),
                ],
            ),
            evaluation(
                "e2",
                EvaluationResult::Rejected,
                vec![
                    check(Side::Long, "price_zone", false),
                    check(Side::Short, "price_zone", false),
                ],
            ),
            evaluation(
                "e3",
                EvaluationResult::Rejected,
                vec![check(Side::Long, "ema_touch", false)],
            ),
        ];
        let breakdown = RejectionBreakdown::calculate(&evaluations);

        let ranked: Vec<(&str, usize)> = breakdown
            .reasons
            .iter()
            .map(|r| (r.name.as_str(), r.count))
            .collect();
        assert_eq!(
            ranked,
            vec![("ema_touch", 2), ("price_zone", 2), ("rsi_oversold", 1)]
        );
        assert_eq!(breakdown.total, 3);
        assert_eq!(breakdown.signals, 0);
    }

    #[test]
    fn failing_checks_on_signals_are_ignored() {
        let evaluations = vec![
            evaluation(
                "sig",
                EvaluationResult::SignalLong,
                vec![
                    check(Side::Long, "rsi_oversold", true),
                    check(Side::Short, "rsi_overbought", false),
                ],
            ),
            evaluation(
                "rej",
                EvaluationResult::Rejected,
                vec![check(Side::Long, "rsi_oversold", false)],
            ),
        ];
        let breakdown = RejectionBreakdown::calculate(&evaluations);
        assert_eq!(breakdown.reasons.len(), 1);
        assert_eq!(breakdown.reasons[0].name, "rsi_oversold");
        assert!(breakdown.reasons.iter().all(|r| r.name != "rsi_overbought"));
        assert_eq!(breakdown.total, 1);
        assert_eq!(breakdown.signals, 1);
    }

    #[test]
    fn no_rejections_is_empty() {
        let evaluations = vec![evaluation("sig", EvaluationResult::SignalShort, vec![])];
        let breakdown = RejectionBreakdown::calculate(&evaluations);
        assert!(breakdown.reasons.is_empty());
        assert_eq!(breakdown.total, 0);
        assert!(RejectionBreakdown::calculate(&[]).reasons.is_empty());
    }

    #[test]
    fn share_and_bar_width() {
        let evaluations = vec![
            evaluation(
                "e1",
                EvaluationResult::Rejected,
                vec![check(Side::Long, "a", false), check(Side::Long, "b", false)],
            ),
            evaluation("e2", EvaluationResult::Rejected, vec![check(Side::Long, "a", false)]),
            evaluation("e3", EvaluationResult::Rejected, vec![check(Side::Long, "a", false)]),
            evaluation("e4", EvaluationResult::Rejected, vec![check(Side::Long, "a", false)]),
        ];
        let breakdown = RejectionBreakdown::calculate(&evaluations);
        let b = &breakdown.reasons[1];
        assert_eq!(breakdown.share_pct(&breakdown.reasons[0]), dec!(100));
        assert_eq!(breakdown.share_pct(b), dec!(25));
        assert_eq!(breakdown.bar_width_pct(b), dec!(25));
        assert_eq!(breakdown.top(1).len(), 1);
        assert_eq!(breakdown.top(10).len(), 2);
    }
}
