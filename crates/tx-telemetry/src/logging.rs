//! Structured logging bootstrap.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or JSON formatting layer. JSON lines carry the span fields
//! (`sender{id, label}`) so output from several senders can be told apart.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Returns `TelemetryError::AlreadyInitialized` if another subscriber has
/// already been installed in this process.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(config.thread_ids)
            .with_current_span(true);
        registry.with(json_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(config.thread_ids);
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        level = %config.log_level,
        "Logging initialized"
    );

    Ok(())
}
