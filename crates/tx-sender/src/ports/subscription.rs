//! Status subscription handle returned by `NodeRpc::submit_and_watch`.

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::{TxHash, TxStatus};

/// Sending half, held by the node adapter.
pub type StatusSender = mpsc::UnboundedSender<TxStatus>;

/// A live subscription to one transaction's status stream.
///
/// When dropped, the subscription is closed and the adapter's unsubscribe
/// hook runs.
pub struct StatusSubscription {
    tx_hash: TxHash,
    receiver: mpsc::UnboundedReceiver<TxStatus>,
    on_close: Option<Box<dyn FnOnce(TxHash) + Send + Sync>>,
}

impl std::fmt::Debug for StatusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSubscription")
            .field("tx_hash", &self.tx_hash)
            .field("on_close", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

impl StatusSubscription {
    /// Create a subscription and its sending half.
    pub fn channel(tx_hash: TxHash) -> (StatusSender, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            sender,
            Self {
                tx_hash,
                receiver,
                on_close: None,
            },
        )
    }

    /// Run `hook` when the subscription is dropped.
    pub fn on_close<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(TxHash) + Send + Sync + 'static,
    {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// Receive the next status.
    ///
    /// Returns `None` once the node side has closed the stream.
    pub async fn recv(&mut self) -> Option<TxStatus> {
        self.receiver.recv().await
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(hook) = self.on_close.take() {
            hook(self.tx_hash);
        }
        debug!(tx_hash = ?self.tx_hash, "Status subscription dropped");
    }
}
