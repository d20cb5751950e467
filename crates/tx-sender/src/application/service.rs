//! Transaction Sender Service
//!
//! Main service implementing TransactionSenderApi: the nonce-safe
//! submitter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument, Span};

use crate::adapters::ExitProcess;
use crate::application::gate::{ResolutionGate, Submission};
use crate::application::key_lock::KeyedLockRegistry;
use crate::application::observer::{LifecycleObserver, Watch};
use crate::config::{ConfigError, SenderConfig};
use crate::domain::{
    AccountRef, NodeError, PendingTransaction, SenderError, SigningIdentity, UnsignedTransaction,
};
use crate::ports::inbound::TransactionSenderApi;
use crate::ports::outbound::{Keyring, MetadataRegistry, NodeRpc, ProcessHalt};
use crate::ports::subscription::StatusSubscription;

static INSTANCE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Result of the locked section.
enum Broadcast {
    Accepted {
        pending: PendingTransaction,
        subscription: StatusSubscription,
    },
    Rejected {
        call: String,
        reason: NodeError,
        rendered: serde_json::Value,
    },
}

/// Transaction Sender Service
///
/// Per submission:
/// 1. Resolve the signing identity
/// 2. Acquire the address's submission lock
/// 3. Fetch the next account index, sign, render, broadcast
/// 4. Release the lock
/// 5. Spawn a watcher that resolves the returned `Submission`
pub struct TransactionSender {
    id: usize,
    config: SenderConfig,
    node: Arc<dyn NodeRpc>,
    keyring: Arc<dyn Keyring>,
    metadata: Arc<dyn MetadataRegistry>,
    halt: Arc<dyn ProcessHalt>,
    locks: Arc<KeyedLockRegistry>,
    diagnostics: Arc<AtomicBool>,
    span: Span,
}

impl TransactionSender {
    /// Create a sender using the process-wide lock registry.
    pub fn new(
        config: SenderConfig,
        node: Arc<dyn NodeRpc>,
        keyring: Arc<dyn Keyring>,
        metadata: Arc<dyn MetadataRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let id = INSTANCE_COUNT.fetch_add(1, Ordering::Relaxed);
        let span = info_span!("sender", id = id, label = %config.label);
        let diagnostics = Arc::new(AtomicBool::new(config.diagnostics));

        Ok(Self {
            id,
            config,
            node,
            keyring,
            metadata,
            halt: Arc::new(ExitProcess),
            locks: KeyedLockRegistry::global(),
            diagnostics,
            span,
        })
    }

    /// Use a dedicated lock registry instead of the process-wide one.
    pub fn with_lock_registry(mut self, locks: Arc<KeyedLockRegistry>) -> Self {
        self.locks = locks;
        self
    }

    /// Replace the hook invoked under `FatalPolicy::Abort`.
    pub fn with_process_halt(mut self, halt: Arc<dyn ProcessHalt>) -> Self {
        self.halt = halt;
        self
    }

    /// Process-unique instance number.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn lock_registry(&self) -> &Arc<KeyedLockRegistry> {
        &self.locks
    }

    /// Critical section: nonce fetch, sign and broadcast initiation.
    ///
    /// The lock guard is dropped on every return path, including `?`.
    async fn broadcast(
        &self,
        identity: &SigningIdentity,
        tx: &UnsignedTransaction,
    ) -> Result<Broadcast, SenderError> {
        let address = &identity.address;

        let wait_started = Instant::now();
        let _guard = self.locks.acquire(address.as_str()).await;
        tx_telemetry::observe_lock_wait(wait_started.elapsed());
        tx_telemetry::record_submission();

        let nonce = self
            .node
            .next_account_index(address)
            .await
            .map_err(SenderError::NodeUnavailable)?;

        let signed = self.keyring.sign(identity, tx, nonce)?;
        let rendered = self.keyring.render_human_readable(&signed);

        match self.node.submit_and_watch(&signed).await {
            Ok(subscription) => {
                info!(
                    call = %signed.label(),
                    address = %address,
                    nonce = nonce,
                    tx_hash = ?signed.hash,
                    "Submitted tx"
                );
                Ok(Broadcast::Accepted {
                    pending: PendingTransaction::new(&signed, rendered),
                    subscription,
                })
            }
            Err(reason) => {
                info!(
                    call = %signed.label(),
                    address = %address,
                    nonce = nonce,
                    error = %reason,
                    tx = %rendered,
                    "Submitting tx failed"
                );
                Ok(Broadcast::Rejected {
                    call: signed.label(),
                    reason,
                    rendered,
                })
            }
        }
    }
}

#[async_trait]
impl TransactionSenderApi for TransactionSender {
    async fn submit(
        &self,
        account: &AccountRef,
        tx: UnsignedTransaction,
    ) -> Result<Submission, SenderError> {
        let identity = self.keyring.resolve(account)?;
        let (gate, submission) = ResolutionGate::new();

        let broadcast = self
            .broadcast(&identity, &tx)
            .instrument(self.span.clone())
            .await?;

        match broadcast {
            Broadcast::Accepted {
                pending,
                subscription,
            } => {
                let submission = submission.with_pending(pending.tx_hash, pending.nonce);
                let watch = Watch {
                    pending,
                    subscription,
                    gate,
                    node: self.node.clone(),
                    metadata: self.metadata.clone(),
                    halt: self.halt.clone(),
                    diagnostics: self.diagnostics.clone(),
                    policy: self.config.fatal_policy,
                    timeout: self.config.finalization_timeout,
                    observer: LifecycleObserver::new(self.config.surface_never_included),
                };
                tokio::spawn(watch.run().instrument(self.span.clone()));
                Ok(submission)
            }
            Broadcast::Rejected {
                call,
                reason,
                rendered,
            } => {
                tx_telemetry::record_rejection();
                gate.resolve(Err(SenderError::SubmissionRejected {
                    call,
                    reason,
                    tx: rendered,
                }));
                Ok(submission)
            }
        }
    }

    fn enable_diagnostics(&self) {
        self.diagnostics.store(true, Ordering::Relaxed);
        self.span.in_scope(|| debug!("Diagnostics enabled"));
    }

    fn disable_diagnostics(&self) {
        self.diagnostics.store(false, Ordering::Relaxed);
        self.span.in_scope(|| debug!("Diagnostics disabled"));
    }

    fn diagnostics_enabled(&self) -> bool {
        self.diagnostics.load(Ordering::Relaxed)
    }
}
