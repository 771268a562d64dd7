// src/types.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationResult {
    SignalLong,
    SignalShort,
    Rejected,
}

impl EvaluationResult {
    pub fn is_signal(&self) -> bool {
        !matches!(self, EvaluationResult::Rejected)
    }
}

/// One realized fill (full or partial close).
///
/// `pnl_pct` is carried verbatim from upstream and never re-derived from `pnl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    #[serde(default)]
    pub position_id: Option<String>,
    pub symbol: String,
    pub side: Side,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub qty: Decimal,
    pub leverage: Decimal,
    pub sl: Decimal,
    pub tp: Decimal,
    pub pnl: Decimal,
    pub pnl_pct: Decimal,
    pub fees: Decimal,
    #[serde(default)]
    pub risk_amount: Decimal,
    pub open_time: DateTime<Utc>,
    pub close_time: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    #[serde(default)]
    pub is_partial: bool,
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Close time when known, creation time for trades that never closed.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.close_time.unwrap_or(self.created_at)
    }

    pub fn close_reason(&self) -> CloseReason {
        CloseReason::classify(self.reason.as_deref())
    }
}

/// Display tone of a trade's free-form closure label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Stop,
    Trailing,
    Target,
}

impl CloseReason {
    pub fn classify(reason: Option<&str>) -> Self {
        match reason {
            Some(r) if r.contains("stop") => CloseReason::Stop,
            Some(r) if r.contains("trailing") => CloseReason::Trailing,
            _ => CloseReason::Target,
        }
    }

    pub fn label(reason: Option<&str>) -> &str {
        reason.unwrap_or("close")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TpTarget {
    pub sort_order: i32,
    pub price: Decimal,
    pub ratio: Decimal,
    pub target_qty: Decimal,
    pub filled_qty: Decimal,
    pub hit: bool,
    pub label: Option<String>,
}

/// Aggregate of one or more trades sharing the same entry.
///
/// Open positions usually omit the aggregate P&L fields, they default to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub qty: Decimal,
    #[serde(default)]
    pub original_qty: Decimal,
    pub entry_price: Decimal,
    pub sl: Decimal,
    pub tp: Decimal,
    pub leverage: Decimal,
    pub open_time: DateTime<Utc>,
    pub is_closed: bool,
    #[serde(default)]
    pub trailing_active: bool,
    #[serde(default)]
    pub best_price: Decimal,
    #[serde(default)]
    pub risk_amount: Decimal,
    #[serde(default)]
    pub total_pnl: Decimal,
    #[serde(default)]
    pub total_fees: Decimal,
    #[serde(default)]
    pub net_pnl: Decimal,
    #[serde(default)]
    pub trade_count: u32,
    #[serde(default)]
    pub is_win: bool,
    #[serde(default)]
    pub tp_targets: Vec<TpTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionCheck {
    #[serde(default)]
    pub id: Option<String>,
    pub side: Side,
    pub condition_name: String,
    pub expected_value: String,
    pub actual_value: String,
    pub passed: bool,
}

/// The engine's decision record for one candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEvaluation {
    pub id: String,
    pub symbol: String,
    pub result: EvaluationResult,
    pub close_price: Decimal,
    pub rsi_value: Decimal,
    pub atr_value: Decimal,
    pub ema_fast_value: Decimal,
    pub ema_slow_value: Decimal,
    #[serde(default)]
    pub checks: Vec<ConditionCheck>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub symbol: String,
    pub leverage: Decimal,
    pub status: SessionStatus,
    #[serde(default)]
    pub simulation: bool,
    pub starting_balance: Decimal,
    pub current_balance: Decimal,
    #[serde(default)]
    pub current_equity: Decimal,
    #[serde(default)]
    pub risk_per_trade_pct: Option<Decimal>,
    #[serde(default)]
    pub max_notional_usdt: Option<Decimal>,
    #[serde(default)]
    pub min_profit_usdt: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Everything fetched for one session at one instant.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: Session,
    pub trades: Vec<Trade>,
    pub evaluations: Vec<SignalEvaluation>,
}

// --- Engine <-> TUI messages ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalFilter {
    #[default]
    All,
    Signals,
    Rejected,
}

impl EvalFilter {
    pub fn matches(&self, evaluation: &SignalEvaluation) -> bool {
        match self {
            EvalFilter::All => true,
            EvalFilter::Signals => evaluation.result.is_signal(),
            EvalFilter::Rejected => evaluation.result == EvaluationResult::Rejected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvalFilter::All => "all",
            EvalFilter::Signals => "signals",
            EvalFilter::Rejected => "rejected",
        }
    }
}

/// What the TUI needs to draw the evaluation timeline.
#[derive(Debug, Clone, Default)]
pub struct EvaluationPanel {
    pub filter: EvalFilter,
    pub rows: Vec<SignalEvaluation>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Report(Box<crate::analytics::DashboardReport>),
    Sessions(Box<crate::analytics::overview::SessionsOverview>),
    Evaluations(EvaluationPanel),
    Status(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    SetFilter(EvalFilter),
    SelectNext,
    SelectPrev,
    Reload,
    Quit,
}
