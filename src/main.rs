//! Stock Browser - Main Entry Point
//!
//! Console client for browsing a remote stock dataset.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use stock_browser::constants::LOG_FILE_PREFIX;
use stock_browser::domain::config::LoggingConfig;
use stock_browser::features::stocks::controller::StocksController;
use stock_browser::helpers::{get_or_create_data_dir, is_development};
use stock_browser::services::{HttpStockProvider, block_on};
use stock_browser::utils::config_store::{config_path, load_app_config};
use stock_browser::views::console;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// With file logging on, output goes only to a daily-rolling file so it
/// does not interleave with the console tables.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {}", config.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if !config.file {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    }

    let dir = get_or_create_data_dir()?;
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    builder.with_writer(writer).with_ansi(false).init();
    if is_development() {
        eprintln!("Logging to {}", dir.display());
    }
    Ok(Some(guard))
}

fn main() -> anyhow::Result<()> {
    let path = config_path()?;
    let config =
        load_app_config(&path).with_context(|| format!("Failed to load {}", path.display()))?;

    // Held until exit so buffered log lines are flushed
    let _guard = init_tracing(&config.logging)?;

    let provider = HttpStockProvider::new(&config.provider)?;
    info!(
        config = %path.display(),
        provider = %provider.base_url(),
        policy = ?config.session.response_policy,
        "Starting stock browser"
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let controller = StocksController::new(Arc::new(provider), &config.session).with_events(tx);

    block_on(console::run(controller, rx))?;
    Ok(())
}
