// Logging module for structured logging using the tracing crate

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Text,
    /// One JSON object per event, for log aggregation systems
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

/// Build the event filter: `RUST_LOG` when set, otherwise `default_level`.
pub fn build_filter(default_level: &str) -> Result<EnvFilter, Box<dyn Error + Send + Sync>> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => Ok(EnvFilter::try_new(directives)?),
        _ => Ok(EnvFilter::try_new(default_level)?),
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// Events go to stderr so that stdout stays free for tool output.
///
/// # Errors
///
/// Returns an error if the filter directives are invalid or a global
/// subscriber has already been installed.
///
/// # Examples
///
/// ```
/// use watermarker::logging::{init_subscriber, LogFormat};
///
/// init_subscriber(LogFormat::Text, "info").expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(
    format: LogFormat,
    default_level: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = build_filter(default_level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
