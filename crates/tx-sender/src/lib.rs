//! # Transaction Sender
//!
//! Nonce-safe transaction submission for many concurrent callers sharing a
//! handful of signing accounts.
//!
//! For each submission the sender takes the account's lock, fetches the
//! next account index from the node (pool included), signs, starts the
//! broadcast and releases the lock. A watcher task then follows the
//! transaction's status stream and resolves the caller's [`Submission`]
//! exactly once: with a [`Receipt`] on success, or with the
//! [`SenderError`] describing how it ended.
//!
//! ## Architecture
//!
//! - **Domain**: Identities, transactions, lifecycle status, typed event records, outcomes
//! - **Ports**: Inbound (TransactionSenderApi) and Outbound (NodeRpc, Keyring, MetadataRegistry, ProcessHalt)
//! - **Application**: Keyed lock registry, resolution gate, lifecycle observer, classifier, service
//! - **Adapters**: SimulatedNode, DevKeyring, StaticMetadata, ExitProcess
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tx_sender::{
//!     DevKeyring, SenderConfig, SimulatedNode, StaticMetadata, TransactionSender,
//!     TransactionSenderApi, UnsignedTransaction,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let keyring = Arc::new(DevKeyring::with_dev_accounts());
//! let alice = keyring.address_of("//Alice").ok_or("no alice")?;
//!
//! let sender = TransactionSender::new(
//!     SenderConfig::labelled("example"),
//!     Arc::new(SimulatedNode::new()),
//!     keyring,
//!     Arc::new(StaticMetadata::new()),
//! )?;
//!
//! let tx = UnsignedTransaction::new("system", "remark", vec![0x00]);
//! let receipt = sender.sign_and_send(&alice.into(), tx).await?;
//! println!("included in {:?}", receipt.block_hash);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{DevKeyring, ExitProcess, NodeCall, Script, SimulatedNode, StaticMetadata};
pub use application::{KeyedLockRegistry, ResolutionGate, Submission, TransactionSender};
pub use config::{ConfigError, FatalPolicy, SenderConfig};
pub use domain::*;
pub use ports::inbound::TransactionSenderApi;
pub use ports::outbound::{Keyring, MetadataRegistry, ModuleErrorMeta, NodeRpc, ProcessHalt};
pub use ports::subscription::{StatusSender, StatusSubscription};
