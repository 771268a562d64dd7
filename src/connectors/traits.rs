// src/connectors/traits.rs
use crate::error::DashResult;
use crate::types::{EvaluationResult, Session, SignalEvaluation, Trade};
use async_trait::async_trait;

/// Remote source of session records. Implementations own transport and auth;
/// callers receive fully typed records.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn sessions(&self) -> DashResult<Vec<Session>>;

    /// Session with its positions (and their take-profit targets) embedded.
    async fn session(&self, id: &str) -> DashResult<Session>;

    async fn trades(&self, session_id: &str, limit: usize) -> DashResult<Vec<Trade>>;

    /// Server-side filtered evaluations, `None` for every result kind.
    async fn evaluations(
        &self,
        session_id: &str,
        limit: usize,
        result: Option<EvaluationResult>,
    ) -> DashResult<Vec<SignalEvaluation>>;
}
