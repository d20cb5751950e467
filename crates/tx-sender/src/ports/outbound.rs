//! Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the sender depends on: the node's RPC and subscription
//! channel, the keyring, the chain metadata registry and the process-halt
//! hook used by the `Abort` fatal policy.

use async_trait::async_trait;

use crate::domain::{
    AccountAddress, AccountRef, BlockHash, EventRecord, FatalReport, KeyringError,
    ModuleErrorIndex, NodeError, Nonce, SignedTransaction, SigningIdentity, TxHash,
    UnsignedTransaction,
};
use crate::ports::subscription::StatusSubscription;

/// Node RPC and subscription channel
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Next account index for `address`, including transactions already in
    /// the node's pool.
    async fn next_account_index(&self, address: &AccountAddress) -> Result<Nonce, NodeError>;

    /// Broadcast a signed transaction and subscribe to its status changes.
    ///
    /// Returning `Ok` means the node accepted the transaction into its own
    /// ordering; a later nonce query must account for it.
    async fn submit_and_watch(
        &self,
        tx: &SignedTransaction,
    ) -> Result<StatusSubscription, NodeError>;

    /// Records emitted by extrinsic `tx_hash` in `block`.
    async fn block_records(
        &self,
        block: BlockHash,
        tx_hash: TxHash,
    ) -> Result<Vec<EventRecord>, NodeError>;
}

/// Metadata entry for a module error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleErrorMeta {
    pub module: String,
    pub name: String,
    pub docs: Vec<String>,
}

/// Chain metadata lookup
pub trait MetadataRegistry: Send + Sync {
    /// Resolve `(module_index, error_index)` to its declared name.
    fn find_module_error(&self, index: ModuleErrorIndex) -> Option<ModuleErrorMeta>;
}

/// Identity resolution and signing
pub trait Keyring: Send + Sync {
    /// Map an account reference to a concrete signing identity.
    fn resolve(&self, account: &AccountRef) -> Result<SigningIdentity, KeyringError>;

    /// Sign `tx` with `nonce`.
    fn sign(
        &self,
        identity: &SigningIdentity,
        tx: &UnsignedTransaction,
        nonce: Nonce,
    ) -> Result<SignedTransaction, KeyringError>;

    /// Human-readable rendering of a signed transaction, for diagnostics.
    fn render_human_readable(&self, tx: &SignedTransaction) -> serde_json::Value;
}

/// Invoked under `FatalPolicy::Abort` when a nonce gap is observed.
///
/// The production implementation never returns.
pub trait ProcessHalt: Send + Sync {
    fn halt(&self, report: &FatalReport);
}
