//! Dispatch outcome derived from an extrinsic's records.

use std::fmt;

/// Why a dispatch failed, after metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// Module-scoped error resolved through chain metadata
    Module { module: String, name: String },
    /// Non-module error, or module indices unknown to the metadata
    Opaque(String),
}

impl DispatchFailure {
    /// Error name for module errors, the opaque marker otherwise.
    pub fn name(&self) -> &str {
        match self {
            DispatchFailure::Module { name, .. } => name,
            DispatchFailure::Opaque(marker) => marker,
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchFailure::Module { module, name } => write!(f, "{}.{}", module, name),
            DispatchFailure::Opaque(marker) => write!(f, "opaque dispatch error ({})", marker),
        }
    }
}

/// Exactly one of these is produced per resolved transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    Failure(DispatchFailure),
    /// Outer dispatch succeeded; the privileged call it wrapped failed
    SudoDispatchFailure(DispatchFailure),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success)
    }

    /// Label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchOutcome::Success => "success",
            DispatchOutcome::Failure(_) => "failure",
            DispatchOutcome::SudoDispatchFailure(_) => "sudo_failure",
        }
    }
}
