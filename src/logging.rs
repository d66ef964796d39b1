//! File logging via `tracing`. The terminal is owned by the TUI, so log
//! output goes to `<data dir>/equipdesk/equipdesk.log`.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;

/// Errors that can occur while installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine data directory")]
    NoDataDir,

    #[error("invalid log level: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("logger already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(config: &AppConfig) -> Result<WorkerGuard, LoggingError> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, "equipdesk.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter(&config.log_level)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(guard)
}

fn log_dir() -> Result<PathBuf, LoggingError> {
    let data_dir = dirs::data_dir().ok_or(LoggingError::NoDataDir)?;
    Ok(data_dir.join("equipdesk"))
}

fn filter(level: &str) -> Result<EnvFilter, LoggingError> {
    Ok(EnvFilter::try_new(level)?)
}
