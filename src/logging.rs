//! File-backed tracing setup.
//!
//! The terminal belongs to the TUI, so logs only go to a file. Without a log
//! file no subscriber is installed and `tracing` calls are no-ops.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
pub enum LogInitError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Build the filter: `RUST_LOG` wins over the configured default.
pub fn env_filter(default: &str) -> Result<EnvFilter, LogInitError> {
    env_filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), default)
}

/// Parse `env` when it is set and non-blank, otherwise `default`. A bad
/// `env` value is an error, not a silent fallback.
pub fn env_filter_from(env: Option<String>, default: &str) -> Result<EnvFilter, LogInitError> {
    let filter = match env {
        Some(env) if !env.trim().is_empty() => env,
        _ => default.to_string(),
    };
    EnvFilter::try_new(&filter).map_err(|e| LogInitError::Filter {
        message: e.to_string(),
        filter,
    })
}

/// Install a global subscriber writing to `path`. Returns whether one was
/// installed.
pub fn init(path: Option<&Path>, filter: &str) -> Result<bool, LogInitError> {
    let Some(path) = path else {
        return Ok(false);
    };
    let filter = env_filter(filter)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LogInitError::Install(e.to_string()))?;
    Ok(true)
}
