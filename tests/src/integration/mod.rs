//! # Integration Flows
//!
//! Every test drives a real `TransactionSender` against `SimulatedNode` and
//! bounds each await with `tokio::time::timeout`.

mod nonce_ordering;
mod outcomes;
