//! Core entities: identities, transactions and receipts.

use primitive_types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::records::EventRecord;

/// Per-account transaction counter.
pub type Nonce = u64;

/// Hash of a signed extrinsic.
pub type TxHash = H256;

/// Hash of a block.
pub type BlockHash = H256;

/// Stable, encoded account address. Used as the key of the submission lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque reference to an account, resolved to a signing identity by the keyring.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountRef {
    /// Already-encoded address
    Address(AccountAddress),
    /// Raw 32-byte public key
    PublicKey([u8; 32]),
}

impl From<AccountAddress> for AccountRef {
    fn from(address: AccountAddress) -> Self {
        Self::Address(address)
    }
}

impl From<&AccountAddress> for AccountRef {
    fn from(address: &AccountAddress) -> Self {
        Self::Address(address.clone())
    }
}

impl From<&str> for AccountRef {
    fn from(address: &str) -> Self {
        Self::Address(AccountAddress::new(address))
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Address(address) => write!(f, "{}", address),
            AccountRef::PublicKey(key) => write!(f, "0x{}", hex::encode(key)),
        }
    }
}

/// Secret key material. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

/// A concrete signing identity: address plus key material.
///
/// Owned by the keyring; the sender borrows it for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    pub address: AccountAddress,
    pub public_key: [u8; 32],
    pub key: KeyMaterial,
}

/// An already-built, not-yet-signed transaction.
///
/// The sender never looks inside `encoded_call`; `section`/`method` and
/// `args` are carried for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub section: String,
    pub method: String,
    pub args: serde_json::Value,
    pub encoded_call: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn new(section: impl Into<String>, method: impl Into<String>, encoded_call: Vec<u8>) -> Self {
        Self {
            section: section.into(),
            method: method.into(),
            args: serde_json::Value::Null,
            encoded_call,
        }
    }

    /// Attach a human-readable rendering of the call arguments.
    pub fn with_args(mut self, args: serde_json::Value) -> Self {
        self.args = args;
        self
    }

    /// `section.method`
    pub fn label(&self) -> String {
        format!("{}.{}", self.section, self.method)
    }
}

/// A transaction signed with a concrete nonce, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub hash: TxHash,
    pub signer: AccountAddress,
    pub nonce: Nonce,
    pub call: UnsignedTransaction,
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    pub fn label(&self) -> String {
        self.call.label()
    }
}

/// A broadcast transaction awaiting a terminal status.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub tx_hash: TxHash,
    pub signer: AccountAddress,
    pub nonce: Nonce,
    /// `section.method`
    pub call: String,
    /// Human-readable rendering captured before the lock was released
    pub rendered: serde_json::Value,
}

impl PendingTransaction {
    pub fn new(signed: &SignedTransaction, rendered: serde_json::Value) -> Self {
        Self {
            tx_hash: signed.hash,
            signer: signed.signer.clone(),
            nonce: signed.nonce,
            call: signed.label(),
            rendered,
        }
    }
}

/// Lifecycle point at which a submission was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedAt {
    InBlock,
    Finalized,
}

/// Successful resolution of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub signer: AccountAddress,
    pub nonce: Nonce,
    pub call: String,
    pub block_hash: BlockHash,
    pub resolved_at: ResolvedAt,
    /// Records emitted by the extrinsic in `block_hash`
    pub records: Vec<EventRecord>,
}

/// Context handed to the fatal-inconsistency hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalReport {
    pub signer: AccountAddress,
    pub nonce: Nonce,
    pub tx_hash: TxHash,
    pub call: String,
    pub reason: String,
}

impl fmt::Display for FatalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} (nonce {}, tx {:?}): {}",
            self.call, self.signer, self.nonce, self.tx_hash, self.reason
        )
    }
}
