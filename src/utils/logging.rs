//! Logging configuration and setup
//!
//! This module provides logging initialization and the structured logging
//! helpers used by the resolution engine, so that every decision point logs
//! with the same field names.

use std::path::Path;

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::{KeyglotError, Result};

/// Initialize logging based on configuration
///
/// Returns the file appender guard when a log file is configured; the caller
/// must keep it alive for buffered lines to be flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| KeyglotError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    match &config.file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let directory = directory.unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("keyglot.log");

            std::fs::create_dir_all(directory)?;
            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .try_init()
                .map_err(|e| KeyglotError::Config(format!("Failed to install logger: {}", e)))?;

            info!(level = %config.level, file = %file_path, "Logging initialized");
            Ok(Some(guard))
        }
        None => {
            registry
                .try_init()
                .map_err(|e| KeyglotError::Config(format!("Failed to install logger: {}", e)))?;

            info!(level = %config.level, "Logging initialized");
            Ok(None)
        }
    }
}

/// Log an error that the policy turned into a placeholder
pub fn log_suppressed_error(error: &KeyglotError, locale: &str) {
    warn!(
        code = error.code(),
        severity = %error.severity(),
        locale = locale,
        error = %error,
        "Suppressed translation error"
    );
}

/// Log a hop from one locale to the next broader one
pub fn log_fallback_hop(key: &str, from: &str, to: &str) {
    debug!(key = key, from = from, to = to, "Falling back to broader locale");
}

/// Log the substitution of a degraded session for a failed construction
pub fn log_degraded_session(locale: &str, error: &KeyglotError) {
    warn!(
        locale = locale,
        code = error.code(),
        error = %error,
        "Session construction failed, serving placeholders"
    );
}

/// Display form for locales in log lines
pub fn locale_label(locale: &str) -> &str {
    if locale.is_empty() {
        "root"
    } else {
        locale
    }
}
