//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name included in the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Include thread ids in log lines
    pub thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tx-sender".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            thread_ids: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `TXS_SERVICE_NAME`: Service name (default: tx-sender)
    /// - `TXS_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `TXS_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `TXS_THREAD_IDS`: Include thread ids (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: env::var("TXS_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: env::var("TXS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: env::var("TXS_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.json_logs),

            thread_ids: env::var("TXS_THREAD_IDS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.thread_ids),
        }
    }

    /// Configuration suited to test runs: debug output, plain text.
    pub fn for_tests() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
