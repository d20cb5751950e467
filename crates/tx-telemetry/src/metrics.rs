//! Prometheus metrics for the transaction sender.
//!
//! All metrics follow the naming convention: `txs_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Submissions that reached the per-address critical section
    pub static ref SUBMISSIONS_TOTAL: Counter = Counter::new(
        "txs_submissions_total",
        "Total number of transactions submitted for signing and broadcast"
    ).expect("metric creation failed");

    /// Resolved submissions by outcome
    pub static ref OUTCOMES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("txs_outcomes_total", "Resolved submissions by outcome"),
        &["outcome"]  // success/failure/sudo_failure/fatal/timeout/never_included
    ).expect("metric creation failed");

    /// Broadcast attempts refused by the node
    pub static ref REJECTIONS_TOTAL: Counter = Counter::new(
        "txs_rejections_total",
        "Total number of broadcasts rejected by the node"
    ).expect("metric creation failed");

    /// Time spent waiting for the per-address submission lock
    pub static ref LOCK_WAIT_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "txs_lock_wait_seconds",
            "Time spent waiting on the per-address submission lock"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle returned once metrics are registered.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(OUTCOMES_TOTAL.clone()),
        Box::new(REJECTIONS_TOTAL.clone()),
        Box::new(LOCK_WAIT_SECONDS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

pub fn record_submission() {
    SUBMISSIONS_TOTAL.inc();
}

pub fn record_rejection() {
    REJECTIONS_TOTAL.inc();
}

/// Count a resolved submission under the given outcome label.
pub fn record_outcome(outcome: &str) {
    OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn observe_lock_wait(waited: Duration) {
    LOCK_WAIT_SECONDS.observe(waited.as_secs_f64());
}
