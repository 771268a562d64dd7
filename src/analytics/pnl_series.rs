// src/analytics/pnl_series.rs
use crate::types::Trade;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlPoint {
    pub timestamp: DateTime<Utc>,
    pub running_pnl: Decimal,
}

/// Running P&L, one point per trade, oldest first.
///
/// Trades are ordered by effective time with a stable sort, so trades sharing
/// a timestamp keep their given order.
pub fn cumulative_pnl(trades: &[Trade]) -> Vec<PnlPoint> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.effective_time());

    let mut running = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|t| {
            running += t.pnl;
            PnlPoint {
                timestamp: t.effective_time(),
                running_pnl: running,
            }
        })
        .collect()
}

/// Flattens trades from several sessions, newest first (stable for ties).
pub fn merge_recent(lists: Vec<Vec<Trade>>) -> Vec<Trade> {
    let mut all: Vec<Trade> = lists.into_iter().flatten().collect();
    all.sort_by_key(|t| Reverse(t.effective_time()));
    all
}
