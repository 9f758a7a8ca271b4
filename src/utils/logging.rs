//! Structured logging setup on top of `tracing-subscriber`.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::LoggingConfig;
use crate::error::{CodecError, Result};
use std::fs::{File, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

fn open_log_file(path: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CodecError::ConfigError(format!("Failed to open log file '{path}': {e}")))
}

/// Installs the global subscriber described by `config`.
///
/// File output wins over console output when both are enabled. Calling this
/// twice is harmless: the second subscriber is not installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let writer = match (&config.log_file_path, config.log_to_file) {
        (Some(path), true) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        (None, true) => {
            return Err(CodecError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            ))
        }
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::info!(app = %config.app_name, level = %config.log_level, "logging initialized");
    }
    Ok(())
}
