//! # Tx Telemetry
//!
//! Logging bootstrap and Prometheus metrics for the transaction sender.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tx_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TXS_SERVICE_NAME` | `tx-sender` | Service name logged at startup |
//! | `TXS_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TXS_JSON_LOGS` | `false` | Emit JSON formatted logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, observe_lock_wait, record_outcome, record_rejection, record_submission,
    register_metrics, MetricsHandle, LOCK_WAIT_SECONDS, OUTCOMES_TOTAL, REJECTIONS_TOTAL,
    SUBMISSIONS_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(config)?;

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}
