// src/analytics/session.rs
use super::trade_stats::percentage;
use crate::types::{ConditionCheck, Session, Side, SignalEvaluation};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub pnl: Decimal,
    pub pnl_pct: Decimal,
    pub open_positions: usize,
    pub closed_positions: usize,
}

impl SessionSummary {
    pub fn calculate(session: &Session) -> Self {
        let pnl = session.current_balance - session.starting_balance;
        let pnl_pct = if session.starting_balance.is_zero() {
            Decimal::ZERO
        } else {
            pnl / session.starting_balance * Decimal::ONE_HUNDRED
        };
        let open_positions = session.positions.iter().filter(|p| !p.is_closed).count();

        Self {
            pnl,
            pnl_pct,
            open_positions,
            closed_positions: session.positions.len() - open_positions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalEfficiency {
    pub evaluated: usize,
    pub signals: usize,
    pub rejected: usize,
    pub signal_rate: Decimal,
}

impl SignalEfficiency {
    pub fn calculate(evaluations: &[SignalEvaluation]) -> Self {
        let signals = evaluations.iter().filter(|e| e.result.is_signal()).count();
        Self {
            evaluated: evaluations.len(),
            signals,
            rejected: evaluations.len() - signals,
            signal_rate: percentage(signals, evaluations.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideCheckSummary {
    pub long_passed: usize,
    pub long_total: usize,
    pub short_passed: usize,
    pub short_total: usize,
}

impl SideCheckSummary {
    pub fn calculate(evaluation: &SignalEvaluation) -> Self {
        let mut summary = Self::default();
        for check in &evaluation.checks {
            let (passed, total) = match check.side {
                Side::Long => (&mut summary.long_passed, &mut summary.long_total),
                Side::Short => (&mut summary.short_passed, &mut summary.short_total),
            };
            *total += 1;
            if check.passed {
                *passed += 1;
            }
        }
        summary
    }
}

pub fn checks_for_side(evaluation: &SignalEvaluation, side: Side) -> Vec<&ConditionCheck> {
    evaluation.checks.iter().filter(|c| c.side == side).collect()
}
