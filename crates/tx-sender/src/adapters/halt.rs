//! Process-exit adapter for `FatalPolicy::Abort`.

use tracing::error;

use crate::domain::FatalReport;
use crate::ports::outbound::ProcessHalt;

/// Exit code used when a nonce gap aborts the process.
pub const FATAL_EXIT_CODE: i32 = -1;

/// Terminates the process. Never returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitProcess;

impl ProcessHalt for ExitProcess {
    fn halt(&self, report: &FatalReport) {
        error!(report = %report, "Future tx, aborting");
        std::process::exit(FATAL_EXIT_CODE);
    }
}
