//! Resolution Gate
//!
//! One-shot completion shared between the submitter (rejection path) and the
//! watcher task (every other path). The first `resolve` wins; later calls are
//! ignored and reported back as `false`.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::trace;

use crate::domain::{Nonce, Receipt, SenderError, TxHash};

type Resolution = Result<Receipt, SenderError>;

struct GateInner {
    resolved: AtomicBool,
    sender: Mutex<Option<oneshot::Sender<Resolution>>>,
}

/// Completing half. Cheap to clone; all clones share one slot.
#[derive(Clone)]
pub struct ResolutionGate {
    inner: Arc<GateInner>,
}

impl ResolutionGate {
    /// Create a gate and the caller-visible future it completes.
    pub fn new() -> (Self, Submission) {
        let (tx, rx) = oneshot::channel();
        let gate = Self {
            inner: Arc::new(GateInner {
                resolved: AtomicBool::new(false),
                sender: Mutex::new(Some(tx)),
            }),
        };
        let submission = Submission {
            receiver: rx,
            tx_hash: None,
            nonce: None,
        };
        (gate, submission)
    }

    /// Deliver `result` if the gate is still open.
    ///
    /// Returns `true` only for the call that actually completed the gate.
    pub fn resolve(&self, result: Resolution) -> bool {
        if self.inner.resolved.swap(true, Ordering::AcqRel) {
            trace!("Resolution gate already completed; ignoring");
            return false;
        }
        match self.inner.sender.lock().take() {
            Some(tx) => {
                // The caller may have dropped its Submission; that is not an error.
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.load(Ordering::Acquire)
    }
}

/// Caller-visible future for one submission.
///
/// Resolves to a `Receipt` on success or to the `SenderError` describing how
/// the transaction ended.
#[must_use = "a Submission does nothing unless awaited"]
pub struct Submission {
    receiver: oneshot::Receiver<Resolution>,
    tx_hash: Option<TxHash>,
    nonce: Option<Nonce>,
}

impl Submission {
    /// Attach the broadcast transaction's identity.
    pub(crate) fn with_pending(mut self, tx_hash: TxHash, nonce: Nonce) -> Self {
        self.tx_hash = Some(tx_hash);
        self.nonce = Some(nonce);
        self
    }

    /// Hash of the broadcast transaction; `None` if broadcast was rejected.
    pub fn tx_hash(&self) -> Option<TxHash> {
        self.tx_hash
    }

    /// Nonce assigned under the submission lock.
    pub fn nonce(&self) -> Option<Nonce> {
        self.nonce
    }
}

impl Future for Submission {
    type Output = Resolution;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(SenderError::Internal(
                    "resolution gate dropped before completion".into(),
                ))
            })
        })
    }
}
