//! Process exit codes.

use std::process::ExitCode;

use verity_core::errors::{ScanError, VerityError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing to fix, the user declined, or the repair worked.
    Success,
    /// No supported package manager, unreadable manifest, or bad config.
    Environment,
    RepairFailed,
    /// A worker failed or the scan timed out.
    ScanFailed,
    Interrupted,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Environment => 1,
            Self::RepairFailed => 2,
            Self::ScanFailed => 3,
            Self::Interrupted => 130,
        }
    }
}

impl From<&VerityError> for ExitStatus {
    fn from(err: &VerityError) -> Self {
        match err {
            VerityError::Config(_) | VerityError::Provider(_) => Self::Environment,
            VerityError::Scan(ScanError::Cancelled) => Self::Interrupted,
            VerityError::Scan(_) => Self::ScanFailed,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
