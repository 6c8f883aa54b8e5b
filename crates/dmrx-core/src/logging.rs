//! Structured Logging
//!
//! Logging setup via the `tracing` ecosystem. The receiver itself only
//! emits events (configuration, resets, sync detections); this module gives
//! embedding applications a one-call subscriber initialization with level
//! filtering and a choice of output format. The `RUST_LOG` environment
//! variable overrides the configured level.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dmrx_core::logging::{init_logging, LogConfig, LogLevel};
//!
//! init_logging(&LogConfig {
//!     level: LogLevel::Debug,
//!     ..Default::default()
//! });
//!
//! tracing::info!(symbols = 1440, "burst decoded");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Log level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// Multi-line output with full span context.
    Pretty,
    /// Machine-readable JSON lines.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Install a global subscriber for the given configuration.
///
/// Safe to call more than once; subsequent calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let builder = fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // A second initialization in the same process is not an error worth
    // surfacing to the caller.
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig::default();
        init_logging(&config);
        init_logging(&config);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = LogConfig {
            level: LogLevel::Trace,
            format: LogFormat::Json,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("trace"));
        let back: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
