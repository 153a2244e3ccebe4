use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::get_config_dir;

const LOG_FILE_PREFIX: &str = "gemchat.log";

/// Directory receiving the daily log files.
#[must_use]
pub fn log_dir() -> PathBuf {
    get_config_dir().map_or_else(
        || std::env::temp_dir().join("gemchat"),
        |dir| dir.join("logs"),
    )
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "gemchat=debug,info"
        } else {
            "gemchat=info,warn"
        })
    })
}

/// Installs a JSON subscriber writing to a rolling file; the terminal is
/// left to the UI. Keep the guard alive until exit so buffered lines flush.
pub fn init(verbose: bool) -> Option<(PathBuf, WorkerGuard)> {
    let dir = log_dir();

    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return None;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        verbose,
        "Logging initialized"
    );

    Some((dir, guard))
}
