//! Subcommand implementations.

pub mod completion;
pub mod plan;
pub mod shred;

use wipeout_core::BatchReport;

/// How a command ended, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was done.
    Success,
    /// At least one target failed or was skipped.
    Incomplete,
    /// The batch was stopped by Ctrl-C.
    Interrupted,
}

impl Outcome {
    pub fn from_report(report: &BatchReport) -> Self {
        if report.interrupted {
            Self::Interrupted
        } else if report.is_success() {
            Self::Success
        } else {
            Self::Incomplete
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Incomplete => 1,
            Self::Interrupted => 130,
        }
    }
}
