//! Error types for the transaction sender

use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::{BlockHash, Nonce, TxHash};
use crate::domain::outcome::DispatchFailure;

/// All errors a submission can end in.
///
/// `Keyring`/`NodeUnavailable` are returned synchronously
/// from `submit`; the rest resolve the returned `Submission`.
#[derive(Debug, Error)]
pub enum SenderError {
    /// Keyring could not resolve or sign for the account
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringError),

    /// The nonce query could not reach the node
    #[error("Node unavailable: {0}")]
    NodeUnavailable(NodeError),

    /// The node refused the signed transaction at broadcast time
    #[error("Submission of {call} rejected: {reason}")]
    SubmissionRejected {
        call: String,
        reason: NodeError,
        /// Human-readable rendering of the refused transaction
        tx: serde_json::Value,
    },

    /// Included, but its dispatch failed
    #[error("{call} failed on chain: {error}")]
    OnChainFailure {
        call: String,
        tx_hash: TxHash,
        block_hash: BlockHash,
        error: DispatchFailure,
    },

    /// Included and dispatched, but the privileged call it wrapped failed
    #[error("{call} dispatched but its wrapped call failed: {error}")]
    NestedDispatchFailure {
        call: String,
        tx_hash: TxHash,
        block_hash: BlockHash,
        error: DispatchFailure,
    },

    /// Nonce gap observed for a transaction this process assigned
    #[error("Fatal inconsistency for {call} (nonce {nonce}): {reason}")]
    FatalInconsistency {
        call: String,
        nonce: Nonce,
        reason: String,
    },

    /// No terminal status within the configured deadline
    #[error("{call} not resolved within {after:?}")]
    Timeout { call: String, after: Duration },

    /// Left the pool without being included
    #[error("{call} was never included: {status}")]
    NeverIncluded { call: String, status: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SenderError {
    /// Label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SenderError::Keyring(_) => "keyring",
            SenderError::NodeUnavailable(_) => "node_unavailable",
            SenderError::SubmissionRejected { .. } => "rejected",
            SenderError::OnChainFailure { .. } => "failure",
            SenderError::NestedDispatchFailure { .. } => "sudo_failure",
            SenderError::FatalInconsistency { .. } => "fatal",
            SenderError::Timeout { .. } => "timeout",
            SenderError::NeverIncluded { .. } => "never_included",
            SenderError::Internal(_) => "internal",
        }
    }

    /// The transaction reached a block and its dispatch was evaluated.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(
            self,
            SenderError::OnChainFailure { .. } | SenderError::NestedDispatchFailure { .. }
        )
    }

    /// Resolved failure for dispatch errors.
    pub fn dispatch_failure(&self) -> Option<&DispatchFailure> {
        match self {
            SenderError::OnChainFailure { error, .. }
            | SenderError::NestedDispatchFailure { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Errors reported by the node RPC port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError {
    /// Connection to the node failed
    #[error("Node unreachable: {0}")]
    Unreachable(String),

    /// The node answered with an RPC error
    #[error("RPC error {code}: {message}")]
    Rejected { code: i64, message: String },

    /// A state/records query failed
    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors reported by the keyring port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyringError {
    #[error("No signing identity for {0}")]
    UnknownAccount(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}
