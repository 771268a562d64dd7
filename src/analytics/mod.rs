// src/analytics/mod.rs
//! Pure derivations over one session snapshot. Nothing in here performs I/O
//! or keeps state between calls.

pub mod overview;
pub mod pnl_series;
pub mod position_stats;
pub mod rejections;
pub mod session;
pub mod trade_stats;

use crate::types::{Session, SessionSnapshot};
use pnl_series::PnlPoint;
use position_stats::{PositionStats, TpProgress};
use rejections::RejectionBreakdown;
use serde::Serialize;
use session::{SessionSummary, SignalEfficiency};
use trade_stats::TradeStats;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub session: Session,
    pub summary: SessionSummary,
    pub trades: TradeStats,
    pub positions: PositionStats,
    pub tp_progress: Vec<(String, Vec<TpProgress>)>,
    pub pnl_curve: Vec<PnlPoint>,
    pub rejections: RejectionBreakdown,
    pub efficiency: SignalEfficiency,
    /// Trade history as fetched, for the trades table.
    pub recent_trades: Vec<crate::types::Trade>,
}

impl DashboardReport {
    pub fn build(snapshot: &SessionSnapshot) -> Self {
        let positions = &snapshot.session.positions;
        Self {
            session: snapshot.session.clone(),
            summary: SessionSummary::calculate(&snapshot.session),
            trades: TradeStats::calculate(&snapshot.trades),
            positions: PositionStats::calculate(positions),
            tp_progress: position_stats::open_tp_progress(positions),
            pnl_curve: pnl_series::cumulative_pnl(&snapshot.trades),
            rejections: RejectionBreakdown::calculate(&snapshot.evaluations),
            efficiency: SignalEfficiency::calculate(&snapshot.evaluations),
            recent_trades: pnl_series::merge_recent(vec![snapshot.trades.clone()]),
        }
    }
}
