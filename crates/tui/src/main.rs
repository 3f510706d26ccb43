mod app;
mod blink;
mod block_font;
mod theme;

use anyhow::{Context, Result};
use std::{fs, fs::OpenOptions, sync::Mutex};

use tictactoe_core::config::{self, AppConfig};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let (config_path, created) = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;
    if created {
        info!(path = %config_path.display(), "wrote default config");
    }
    info!(path = %config_path.display(), theme = ?config.theme.name, "configuration loaded");

    let mut app = app::TicTacToeApp::new(config);
    app.run().await
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = config.log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("tictactoe.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // stdout belongs to the board, so only the file gets log lines.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
