//! Ports module for the transaction sender
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;
pub mod subscription;

pub use inbound::TransactionSenderApi;
pub use outbound::{Keyring, MetadataRegistry, ModuleErrorMeta, NodeRpc, ProcessHalt};
pub use subscription::{StatusSender, StatusSubscription};
