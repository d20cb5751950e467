//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits: an in-process node double, a
//! development keyring, a static metadata table and the process-exit hook.

mod halt;
mod keyring;
mod metadata;
mod simulated;

pub use halt::ExitProcess;
pub use keyring::DevKeyring;
pub use metadata::StaticMetadata;
pub use simulated::{NodeCall, Script, SimulatedNode};
