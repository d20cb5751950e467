//! Lifecycle Observer
//!
//! `LifecycleObserver` is the pure status state machine. `Watch` is the task
//! spawned per broadcast transaction: it drains the status subscription,
//! drives the state machine, inspects block records and completes the
//! resolution gate.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::application::classifier::classify;
use crate::application::gate::ResolutionGate;
use crate::config::FatalPolicy;
use crate::domain::{
    BlockHash, DispatchOutcome, FatalReport, PendingTransaction, Receipt, ResolvedAt,
    SenderError, TxStatus,
};
use crate::ports::outbound::{MetadataRegistry, NodeRpc, ProcessHalt};
use crate::ports::subscription::StatusSubscription;

/// What the watcher should do after a status event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Log only
    Observe,
    /// Query the block's records and try to classify
    Inspect(BlockHash, ResolvedAt),
    /// Nonce gap; apply the fatal policy
    Fatal,
    /// Left the pool without inclusion
    NeverIncluded(&'static str),
}

/// Status state machine for one transaction.
#[derive(Debug, Clone)]
pub struct LifecycleObserver {
    highest_rank: Option<u8>,
    surface_never_included: bool,
}

impl LifecycleObserver {
    pub fn new(surface_never_included: bool) -> Self {
        Self {
            highest_rank: None,
            surface_never_included,
        }
    }

    /// Highest lifecycle rank seen so far.
    pub fn highest_rank(&self) -> Option<u8> {
        self.highest_rank
    }

    pub fn observe(&mut self, status: &TxStatus) -> Transition {
        let rank = status.rank();
        if let Some(highest) = self.highest_rank {
            if rank < highest {
                warn!(status = %status, "Status arrived out of lifecycle order");
            }
        }
        self.highest_rank = Some(self.highest_rank.map_or(rank, |h| h.max(rank)));

        match status {
            TxStatus::Future => Transition::Fatal,
            TxStatus::Ready | TxStatus::Broadcast(_) | TxStatus::Retracted(_) => {
                Transition::Observe
            }
            TxStatus::InBlock(block) => Transition::Inspect(*block, ResolvedAt::InBlock),
            TxStatus::Finalized(block) => Transition::Inspect(*block, ResolvedAt::Finalized),
            TxStatus::Usurped(_) | TxStatus::Dropped | TxStatus::Invalid => {
                if self.surface_never_included {
                    Transition::NeverIncluded(status.name())
                } else {
                    Transition::Observe
                }
            }
        }
    }
}

/// Watcher task for one broadcast transaction.
pub struct Watch {
    pub(crate) pending: PendingTransaction,
    pub(crate) subscription: StatusSubscription,
    pub(crate) gate: ResolutionGate,
    pub(crate) node: Arc<dyn NodeRpc>,
    pub(crate) metadata: Arc<dyn MetadataRegistry>,
    pub(crate) halt: Arc<dyn ProcessHalt>,
    pub(crate) diagnostics: Arc<AtomicBool>,
    pub(crate) policy: FatalPolicy,
    pub(crate) timeout: Option<Duration>,
    pub(crate) observer: LifecycleObserver,
}

impl Watch {
    /// Drain the subscription until the gate is resolved.
    ///
    /// The subscription is dropped (unsubscribed) when this returns.
    pub async fn run(mut self) {
        let deadline = self.timeout.and_then(|after| {
            let deadline = Instant::now().checked_add(after);
            if deadline.is_none() {
                warn!(?after, "Finalization timeout out of range, watching without deadline");
            }
            deadline
        });

        loop {
            let next = match within(deadline, self.subscription.recv()).await {
                Some(next) => next,
                None => {
                    self.resolve_timeout();
                    break;
                }
            };

            let Some(status) = next else {
                self.finish(Err(SenderError::NeverIncluded {
                    call: self.pending.call.clone(),
                    status: "subscription closed".into(),
                }));
                break;
            };

            debug!(
                tx_hash = ?self.pending.tx_hash,
                nonce = self.pending.nonce,
                status = %status,
                "Status changed"
            );

            let done = match self.observer.observe(&status) {
                Transition::Observe => false,
                Transition::Inspect(block, at) => self.inspect(block, at, deadline).await,
                Transition::Fatal => {
                    self.fatal();
                    true
                }
                Transition::NeverIncluded(name) => {
                    self.finish(Err(SenderError::NeverIncluded {
                        call: self.pending.call.clone(),
                        status: name.to_string(),
                    }));
                    true
                }
            };

            if done {
                break;
            }
        }
    }

    /// Returns `true` once the gate is resolved.
    async fn inspect(&self, block: BlockHash, at: ResolvedAt, deadline: Option<Instant>) -> bool {
        let records = match within(
            deadline,
            self.node.block_records(block, self.pending.tx_hash),
        )
        .await
        {
            None => {
                self.resolve_timeout();
                return true;
            }
            Some(Err(e)) => {
                warn!(block_hash = ?block, error = %e, "Failed to read block records");
                return false;
            }
            Some(Ok(records)) => records,
        };

        let Some(outcome) = classify(&records, self.metadata.as_ref()) else {
            debug!(block_hash = ?block, "No dispatch record yet");
            return false;
        };

        self.log_outcome(&outcome);

        let call = self.pending.call.clone();
        let tx_hash = self.pending.tx_hash;
        let result = match outcome {
            DispatchOutcome::Success => Ok(Receipt {
                tx_hash,
                signer: self.pending.signer.clone(),
                nonce: self.pending.nonce,
                call,
                block_hash: block,
                resolved_at: at,
                records,
            }),
            DispatchOutcome::Failure(error) => Err(SenderError::OnChainFailure {
                call,
                tx_hash,
                block_hash: block,
                error,
            }),
            DispatchOutcome::SudoDispatchFailure(error) => {
                Err(SenderError::NestedDispatchFailure {
                    call,
                    tx_hash,
                    block_hash: block,
                    error,
                })
            }
        };
        self.finish(result);
        true
    }

    fn log_outcome(&self, outcome: &DispatchOutcome) {
        if !self.diagnostics.load(Ordering::Relaxed) {
            return;
        }
        match outcome {
            DispatchOutcome::Success => {}
            DispatchOutcome::Failure(failure) => {
                info!(
                    call = %self.pending.call,
                    error = failure.name(),
                    tx = %self.pending.rendered,
                    "Dispatch Error"
                );
            }
            DispatchOutcome::SudoDispatchFailure(failure) => {
                info!(
                    call = %self.pending.call,
                    error = failure.name(),
                    tx = %self.pending.rendered,
                    "Sudo Dispatch Failed"
                );
            }
        }
    }

    fn fatal(&self) {
        let report = FatalReport {
            signer: self.pending.signer.clone(),
            nonce: self.pending.nonce,
            tx_hash: self.pending.tx_hash,
            call: self.pending.call.clone(),
            reason: "node reported a future status (nonce gap)".into(),
        };
        error!(report = %report, policy = %self.policy, "Future tx observed");

        if self.policy == FatalPolicy::Abort {
            self.halt.halt(&report);
        }

        self.finish(Err(SenderError::FatalInconsistency {
            call: report.call,
            nonce: report.nonce,
            reason: report.reason,
        }));
    }

    fn resolve_timeout(&self) {
        let after = self.timeout.unwrap_or_default();
        warn!(tx_hash = ?self.pending.tx_hash, after = ?after, "Submission timed out");
        self.finish(Err(SenderError::Timeout {
            call: self.pending.call.clone(),
            after,
        }));
    }

    fn finish(&self, result: Result<Receipt, SenderError>) {
        let kind = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        if self.gate.resolve(result) {
            tx_telemetry::record_outcome(kind);
            debug!(tx_hash = ?self.pending.tx_hash, outcome = kind, "Submission resolved");
        }
    }
}

/// Run `fut` until `deadline`; `None` if it elapsed first.
async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}
