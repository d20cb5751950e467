//! Shared fixtures for integration tests and benchmarks.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use tx_sender::{
    AccountAddress, DevKeyring, FatalReport, KeyedLockRegistry, ProcessHalt, Receipt,
    SenderConfig, SenderError, SimulatedNode, StaticMetadata, Submission, TransactionSender,
    UnsignedTransaction,
};
use tx_telemetry::TelemetryConfig;

/// Upper bound for any single await in a test.
pub const WAIT: Duration = Duration::from_secs(5);

/// Halt hook that records reports instead of exiting.
#[derive(Debug, Default)]
pub struct RecordingHalt {
    reports: Mutex<Vec<FatalReport>>,
}

impl RecordingHalt {
    pub fn reports(&self) -> Vec<FatalReport> {
        self.reports.lock().clone()
    }
}

impl ProcessHalt for RecordingHalt {
    fn halt(&self, report: &FatalReport) {
        self.reports.lock().push(report.clone());
    }
}

/// Node double, keyring, metadata and halt hook wired together.
pub struct Harness {
    pub node: SimulatedNode,
    pub keyring: Arc<DevKeyring>,
    pub metadata: Arc<StaticMetadata>,
    pub halt: Arc<RecordingHalt>,
    pub locks: Arc<KeyedLockRegistry>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_node(SimulatedNode::new())
    }

    pub fn with_node(node: SimulatedNode) -> Self {
        init_test_logging();
        let metadata = StaticMetadata::new()
            .with_error(0, 2, "System", "BadOrigin")
            .with_error(5, 1, "Balances", "InsufficientBalance")
            .with_error(7, 0, "Sudo", "RequireSudo");

        Self {
            node,
            keyring: Arc::new(DevKeyring::with_dev_accounts()),
            metadata: Arc::new(metadata),
            halt: Arc::new(RecordingHalt::default()),
            locks: Arc::new(KeyedLockRegistry::new()),
        }
    }

    /// Address for a seed phrase, adding it to the keyring if needed.
    pub fn account(&self, seed: &str) -> AccountAddress {
        self.keyring.add_seed(seed)
    }

    /// Sender on this harness with a dedicated lock registry.
    pub fn sender(&self, config: SenderConfig) -> TransactionSender {
        self.build_sender(config)
            .with_lock_registry(self.locks.clone())
    }

    /// Sender on this harness sharing the process-wide lock registry.
    pub fn global_sender(&self, config: SenderConfig) -> TransactionSender {
        self.build_sender(config)
    }

    fn build_sender(&self, config: SenderConfig) -> TransactionSender {
        TransactionSender::new(
            config,
            Arc::new(self.node.clone()),
            self.keyring.clone(),
            self.metadata.clone(),
        )
        .expect("valid sender config")
        .with_process_halt(self.halt.clone())
    }
}

/// A `system.remark` call with a one-byte payload.
pub fn remark(tag: u8) -> UnsignedTransaction {
    UnsignedTransaction::new("system", "remark", vec![tag])
        .with_args(serde_json::json!({ "remark": format!("0x{:02x}", tag) }))
}

/// A `sudo.sudo` wrapper call.
pub fn sudo_call() -> UnsignedTransaction {
    UnsignedTransaction::new("sudo", "sudo", vec![0x07, 0x00])
}

/// Await `submission`, failing the test if it takes longer than [`WAIT`].
pub async fn resolve(submission: Submission) -> Result<Receipt, SenderError> {
    timeout(WAIT, submission)
        .await
        .expect("submission did not resolve in time")
}

/// Install a debug-level subscriber once per test binary.
pub fn init_test_logging() {
    let _ = tx_telemetry::init_logging(&TelemetryConfig::for_tests());
}
