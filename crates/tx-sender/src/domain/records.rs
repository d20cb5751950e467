//! Typed event records emitted by an extrinsic.
//!
//! Only the record shapes the sender reasons about are modelled; anything
//! else decodes to `RuntimeEvent::Unknown` and is carried through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Module and error indices of a module-scoped dispatch error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleErrorIndex {
    /// Pallet index in the runtime
    pub index: u8,
    /// Error index within the pallet
    pub error: u8,
}

impl ModuleErrorIndex {
    pub fn new(index: u8, error: u8) -> Self {
        Self { index, error }
    }
}

impl fmt::Display for ModuleErrorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {} error {}", self.index, self.error)
    }
}

/// Reason a dispatch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchError {
    /// Error declared by a runtime module; resolved through metadata
    Module(ModuleErrorIndex),
    BadOrigin,
    CannotLookup,
    Other(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Module(idx) => write!(f, "{}", idx),
            DispatchError::BadOrigin => f.write_str("BadOrigin"),
            DispatchError::CannotLookup => f.write_str("CannotLookup"),
            DispatchError::Other(msg) => write!(f, "Other({})", msg),
        }
    }
}

/// Known runtime events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// `system.ExtrinsicSuccess`
    ExtrinsicSuccess,
    /// `system.ExtrinsicFailed`
    ExtrinsicFailed { error: DispatchError },
    /// `sudo.Sudid`: outcome of the call a privileged extrinsic wrapped
    Sudid { result: Result<(), DispatchError> },
    /// Any other record
    Unknown { section: String, method: String },
}

impl RuntimeEvent {
    pub fn section(&self) -> &str {
        match self {
            RuntimeEvent::ExtrinsicSuccess | RuntimeEvent::ExtrinsicFailed { .. } => "system",
            RuntimeEvent::Sudid { .. } => "sudo",
            RuntimeEvent::Unknown { section, .. } => section,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            RuntimeEvent::ExtrinsicSuccess => "ExtrinsicSuccess",
            RuntimeEvent::ExtrinsicFailed { .. } => "ExtrinsicFailed",
            RuntimeEvent::Sudid { .. } => "Sudid",
            RuntimeEvent::Unknown { method, .. } => method,
        }
    }
}

/// Where in block execution a record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    ApplyExtrinsic(u32),
    Finalization,
    Initialization,
}

/// A record emitted in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub phase: Phase,
    pub event: RuntimeEvent,
}

impl EventRecord {
    pub fn new(phase: Phase, event: RuntimeEvent) -> Self {
        Self { phase, event }
    }

    /// Record emitted while applying the extrinsic at `index`.
    pub fn applied(index: u32, event: RuntimeEvent) -> Self {
        Self::new(Phase::ApplyExtrinsic(index), event)
    }
}
