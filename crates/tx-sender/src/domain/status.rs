//! Transaction lifecycle status as reported by the node's subscription.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::{BlockHash, TxHash};

/// One point in a transaction's lifecycle stream.
///
/// Deserializes from the node's JSON notifications: `"ready"`,
/// `{"inBlock": "0x.."}`, `{"broadcast": ["peer", ..]}` and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    /// Nonce gap: the node cannot place the transaction yet
    Future,
    /// In the ready queue
    Ready,
    /// Gossiped to the listed peers
    Broadcast(Vec<String>),
    /// Included in a block
    InBlock(BlockHash),
    /// The including block was retracted
    Retracted(BlockHash),
    /// The including block was finalized
    Finalized(BlockHash),
    /// Replaced by another transaction with the same nonce
    Usurped(TxHash),
    /// Dropped from the pool
    Dropped,
    /// Declared invalid by the pool
    Invalid,
}

impl TxStatus {
    /// Position in the lifecycle ordering. Terminal failures rank last.
    pub fn rank(&self) -> u8 {
        match self {
            TxStatus::Future => 0,
            TxStatus::Ready => 1,
            TxStatus::Broadcast(_) => 2,
            TxStatus::InBlock(_) | TxStatus::Retracted(_) => 3,
            TxStatus::Finalized(_) => 4,
            TxStatus::Usurped(_) | TxStatus::Dropped | TxStatus::Invalid => 5,
        }
    }

    /// No further status follows a terminal one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TxStatus::Finalized(_) | TxStatus::Usurped(_) | TxStatus::Dropped | TxStatus::Invalid
        )
    }

    /// Terminal without block inclusion.
    pub fn is_never_included(&self) -> bool {
        matches!(
            self,
            TxStatus::Usurped(_) | TxStatus::Dropped | TxStatus::Invalid
        )
    }

    /// Block whose records can be queried for this status.
    pub fn block_hash(&self) -> Option<BlockHash> {
        match self {
            TxStatus::InBlock(hash) | TxStatus::Finalized(hash) => Some(*hash),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TxStatus::Future => "future",
            TxStatus::Ready => "ready",
            TxStatus::Broadcast(_) => "broadcast",
            TxStatus::InBlock(_) => "inBlock",
            TxStatus::Retracted(_) => "retracted",
            TxStatus::Finalized(_) => "finalized",
            TxStatus::Usurped(_) => "usurped",
            TxStatus::Dropped => "dropped",
            TxStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_hash() {
            Some(hash) => write!(f, "{}({:?})", self.name(), hash),
            None => f.write_str(self.name()),
        }
    }
}
