// src/analytics/overview.rs
//! Cross-session view: every session's headline numbers plus the trades and
//! positions of the most recent few, merged.

use super::pnl_series::merge_recent;
use super::session::SessionSummary;
use super::trade_stats::TradeStats;
use crate::types::{Position, Session, SessionStatus, Trade};
use serde::Serialize;

/// Sessions whose trades and positions are pulled into the overview.
pub const OVERVIEW_SESSIONS: usize = 5;
/// Trades fetched per session for the overview.
pub const OVERVIEW_TRADES_PER_SESSION: usize = 50;
/// Closed positions shown across sessions.
pub const OVERVIEW_CLOSED_POSITIONS: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub session: Session,
    pub summary: SessionSummary,
}

/// A position tagged with the symbol of the session it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPosition {
    pub session_symbol: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionsOverview {
    pub running: Vec<SessionRow>,
    pub stopped: Vec<SessionRow>,
    pub trades: Vec<Trade>,
    pub trade_stats: TradeStats,
    pub open_positions: Vec<SessionPosition>,
    pub closed_positions: Vec<SessionPosition>,
    /// Closed positions seen before the display cap.
    pub closed_total: usize,
}

impl SessionsOverview {
    /// `details` are the sessions fetched with their positions, `trade_lists`
    /// one trade list per session. Missing entries are simply absent.
    pub fn build(sessions: &[Session], details: &[Session], trade_lists: Vec<Vec<Trade>>) -> Self {
        let (running, stopped): (Vec<SessionRow>, Vec<SessionRow>) = sessions
            .iter()
            .map(|s| SessionRow {
                session: s.clone(),
                summary: SessionSummary::calculate(s),
            })
            .partition(|row| row.session.status == SessionStatus::Running);

        let trades = merge_recent(trade_lists);
        let trade_stats = TradeStats::calculate(&trades);

        let mut open_positions = Vec::new();
        let mut closed_positions = Vec::new();
        for detail in details {
            for position in &detail.positions {
                let tagged = SessionPosition {
                    session_symbol: detail.symbol.clone(),
                    position: position.clone(),
                };
                if position.is_closed {
                    closed_positions.push(tagged);
                } else {
                    open_positions.push(tagged);
                }
            }
        }
        let closed_total = closed_positions.len();
        closed_positions.truncate(OVERVIEW_CLOSED_POSITIONS);

        Self {
            running,
            stopped,
            trades,
            trade_stats,
            open_positions,
            closed_positions,
            closed_total,
        }
    }
}
