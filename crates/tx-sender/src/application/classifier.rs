//! Outcome Classifier
//!
//! Derives a `DispatchOutcome` from the records an extrinsic emitted.

use tracing::trace;

use crate::domain::{DispatchError, DispatchFailure, DispatchOutcome, EventRecord, RuntimeEvent};
use crate::ports::outbound::MetadataRegistry;

/// Classify `records`.
///
/// Returns `None` when neither a success nor a failure record is present,
/// which leaves the transaction unresolved.
pub fn classify(records: &[EventRecord], metadata: &dyn MetadataRegistry) -> Option<DispatchOutcome> {
    let mut success = false;
    let mut failed: Option<&DispatchError> = None;
    let mut sudo_error: Option<&DispatchError> = None;

    for record in records {
        match &record.event {
            RuntimeEvent::ExtrinsicSuccess => success = true,
            RuntimeEvent::ExtrinsicFailed { error } => failed = Some(error),
            RuntimeEvent::Sudid { result: Err(error) } => sudo_error = Some(error),
            RuntimeEvent::Sudid { result: Ok(()) } => {}
            RuntimeEvent::Unknown { section, method } => {
                trace!(section = %section, method = %method, "Skipping unknown record");
            }
        }
    }

    if success {
        return Some(match sudo_error {
            Some(error) => DispatchOutcome::SudoDispatchFailure(resolve_failure(error, metadata)),
            None => DispatchOutcome::Success,
        });
    }

    failed.map(|error| DispatchOutcome::Failure(resolve_failure(error, metadata)))
}

/// Resolve a dispatch error to a named failure through chain metadata.
pub fn resolve_failure(error: &DispatchError, metadata: &dyn MetadataRegistry) -> DispatchFailure {
    match error {
        DispatchError::Module(index) => match metadata.find_module_error(*index) {
            Some(meta) => DispatchFailure::Module {
                module: meta.module,
                name: meta.name,
            },
            None => DispatchFailure::Opaque(index.to_string()),
        },
        other => DispatchFailure::Opaque(other.to_string()),
    }
}
