// guidepanel - device-aware install guide for the terminal
//
// Shows one tab per device family and opens the one matching the current
// device (or the page address fragment). The guide text can be switched to
// a translated language through an embedded translation widget; the choice
// is remembered across runs.
//
// Architecture:
// - detect: pure device detection from agent/platform signals
// - panels: tab/panel state machine with fragment sync and two-phase reveal
// - keyboard: tab strip navigation
// - language + store: persisted language preference with bounded retry
// - tui (ratatui): renders the page and drives timers from one select! loop

mod cli;
mod config;
mod detect;
mod guide;
mod keyboard;
mod language;
mod logging;
mod panels;
mod store;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{Config, LogRotation, LoggingConfig};
use logging::{LogBuffer, TuiLogLayer};
use panels::location::SessionLocation;
use store::{FileStore, MemoryStore};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber
///
/// In TUI mode events go to the in-memory buffer shown in the footer,
/// otherwise to stderr so command output on stdout stays clean. File
/// logging (JSON) is added on top when enabled. The returned guard must
/// live until exit so buffered lines get flushed.
///
/// Precedence: RUST_LOG env var > config level.
fn init_tracing(logging: &LoggingConfig, tui_buffer: Option<&LogBuffer>) -> Option<WorkerGuard> {
    let default_filter = format!("guidepanel={}", logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let console = match tui_buffer {
        Some(buffer) => TuiLogLayer::new(buffer.clone()).boxed(),
        None => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let mut guard = None;
    let file = if logging.file_enabled {
        match std::fs::create_dir_all(&logging.file_dir) {
            Ok(()) => {
                let appender = match logging.file_rotation {
                    LogRotation::Hourly => {
                        tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
                    }
                    LogRotation::Daily => {
                        tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
                    }
                    LogRotation::Never => {
                        tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
                    }
                };
                let (writer, worker) = tracing_appender::non_blocking(appender);
                guard = Some(worker);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Subcommands (config, detect) print and exit
    if cli.command.is_some() {
        let config = Config::from_env();
        let _guard = init_tracing(&config.logging, None);
        cli::handle_cli(&cli)?;
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config.logging, Some(&log_buffer));

    let page_url = cli.url.clone().unwrap_or_else(|| config.page_url.clone());
    let location = SessionLocation::parse(&page_url)?;

    let signals = cli.device.signals();
    let detection = detect::detect(&signals);
    tracing::info!(key = detection.key, url = %location.url(), "Starting guidepanel");

    let store: tui::app::Store = match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path);
            tracing::debug!(path = %store.path().display(), "Preference store opened");
            Box::new(store)
        }
        None => {
            tracing::warn!("No home directory, language preference will not persist");
            Box::new(MemoryStore::new())
        }
    };

    tui::run_tui(config, detection, location, store, log_buffer).await
}
