// src/config.rs

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Monitored session; first running (else first) session when unset.
    pub session_id: Option<String>,
    pub refresh_secs: u64,
    pub trade_limit: usize,
    pub evaluation_limit: usize,
    pub log_dir: String,
    pub log_level: String,
}

impl AppConfig {
    /// Defaults, then `Settings.toml` if present, then `APP_*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("Settings").required(false))
            .add_source(Environment::with_prefix("APP"));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api_url", "http://localhost:3000/api")?
            .set_default("refresh_secs", 15)?
            .set_default("trade_limit", 200)?
            .set_default("evaluation_limit", 200)?
            .set_default("log_dir", "logs")?
            .set_default("log_level", "info")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_secs == 0 {
            return Err(ConfigError::Message("refresh_secs must be positive".into()));
        }
        if self.trade_limit == 0 || self.evaluation_limit == 0 {
            return Err(ConfigError::Message("fetch limits must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = AppConfig::defaults()?
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = from_toml(r#"session_id = "abc""#).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.refresh_secs, 15);
        assert_eq!(config.evaluation_limit, 200);
        assert_eq!(config.session_id.as_deref(), Some("abc"));
        assert!(config.api_token.is_none());
    }

    #[test]
    fn zero_refresh_is_rejected() {
        assert!(from_toml("refresh_secs = 0").is_err());
        assert!(from_toml("trade_limit = 0").is_err());
    }
}
