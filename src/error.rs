// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("API {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to encode query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("no session to monitor")]
    NoSession,
}

pub type DashResult<T> = Result<T, DashError>;
