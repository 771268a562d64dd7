// src/main.rs
use crate::config::AppConfig;
use crate::connectors::api::ApiClient;
use crate::connectors::traits::DataSource;
use crate::core::engine::MonitorEngine;
use dotenvy::dotenv;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, Level};

mod analytics;
mod config;
mod connectors;
mod core;
mod error;
mod tui;
mod types;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Load Configuration
    let config = AppConfig::new()?;

    // 2. Logging goes to a file, the terminal belongs to the dashboard
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "monitor.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!("Sniper monitor v{} starting, API: {}", env!("CARGO_PKG_VERSION"), config.api_url);

    // 3. Data access
    let mut client = ApiClient::new(&config.api_url, config.api_token.clone())?;
    if config.api_token.is_none() {
        if let (Some(email), Some(password)) = (&config.email, &config.password) {
            client.login(email, password).await?;
        }
    }
    let source: Arc<dyn DataSource> = Arc::new(client);

    // 4. Create Channels
    let (ui_tx, ui_rx) = mpsc::channel(100);
    let (command_tx, command_rx) = mpsc::channel(32);

    // 5. Run Engine in the background, TUI in the foreground
    let mut engine = MonitorEngine::new(config, source, command_rx, ui_tx);
    let engine_task = tokio::spawn(async move {
        if let Err(e) = engine.run().await {
            error!("Fatal Engine Error: {}", e);
        }
    });

    let result = tui::run(ui_rx, command_tx).await;
    engine_task.abort();

    if let Err(e) = &result {
        error!("Dashboard error: {}", e);
    }
    result
}
