//! Configuration for the transaction sender

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// What to do when a transaction reports a nonce gap (`future` status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalPolicy {
    /// Hand the report to the process-halt hook (terminates by default).
    /// For deterministic harnesses where a nonce race is a logic bug.
    Abort,
    /// Resolve the submission with `FatalInconsistency` and drop its subscription
    #[default]
    ReportAndAbandon,
}

impl FromStr for FatalPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FatalPolicy::Abort),
            "report_and_abandon" | "report-and-abandon" => Ok(FatalPolicy::ReportAndAbandon),
            other => Err(ConfigError::Invalid(format!("unknown fatal policy '{}'", other))),
        }
    }
}

impl fmt::Display for FatalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalPolicy::Abort => f.write_str("abort"),
            FatalPolicy::ReportAndAbandon => f.write_str("report_and_abandon"),
        }
    }
}

/// Sender configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Label attached to every log line of this sender
    pub label: String,
    /// Initial state of the outcome diagnostics toggle
    pub diagnostics: bool,
    /// Deadline from broadcast to resolution; `None` waits forever
    #[serde(with = "duration_serde")]
    pub finalization_timeout: Option<Duration>,
    /// Policy for nonce-gap statuses
    pub fatal_policy: FatalPolicy,
    /// Resolve `NeverIncluded` on invalid/dropped/usurped
    pub surface_never_included: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            label: "sender".to_string(),
            diagnostics: false,
            finalization_timeout: Some(Duration::from_secs(300)),
            fatal_policy: FatalPolicy::ReportAndAbandon,
            surface_never_included: true,
        }
    }
}

impl SenderConfig {
    /// Default configuration with the given label.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `TXS_SENDER_LABEL`: Log label (default: sender)
    /// - `TXS_DIAGNOSTICS`: Enable outcome diagnostics (default: false)
    /// - `TXS_FINALIZATION_TIMEOUT`: e.g. `90s`, `500ms`, `5m`, `none` (default: 300s)
    /// - `TXS_FATAL_POLICY`: `abort` or `report_and_abandon`
    ///
    /// Unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            label: env::var("TXS_SENDER_LABEL").unwrap_or(defaults.label),

            diagnostics: env::var("TXS_DIAGNOSTICS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.diagnostics),

            finalization_timeout: env::var("TXS_FINALIZATION_TIMEOUT")
                .ok()
                .and_then(|v| duration_serde::parse_optional(&v).ok())
                .unwrap_or(defaults.finalization_timeout),

            fatal_policy: env::var("TXS_FATAL_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fatal_policy),

            surface_never_included: defaults.surface_never_included,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::Invalid("label cannot be empty".into()));
        }

        if matches!(self.finalization_timeout, Some(t) if t.is_zero()) {
            return Err(ConfigError::InvalidTimeout(
                "finalization_timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Human-readable `Option<Duration>` serialization: `"90s"`, `"500ms"`, `"5m"`, `"none"`.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) if d.subsec_millis() != 0 => {
                serializer.serialize_str(&format!("{}ms", d.as_millis()))
            }
            Some(d) => serializer.serialize_str(&format!("{}s", d.as_secs())),
            None => serializer.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_optional(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_optional(s: &str) -> Result<Option<Duration>, &'static str> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("off") {
            return Ok(None);
        }
        parse_duration(s).map(Some)
    }

    fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
