//! Scan engine errors.

use super::error_code::{self, VerityErrorCode};

/// Errors that end a scan run. Per-file read failures are not errors; they
/// are classified as unreadable and the scan continues.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Worker {worker} failed: {message}")]
    WorkerFailed { worker: usize, message: String },

    #[error("Scan timed out after {timeout_secs}s with {pending} worker(s) still running")]
    Timeout { timeout_secs: u64, pending: usize },

    #[error("Could not start worker {worker}: {source}")]
    Spawn {
        worker: usize,
        source: std::io::Error,
    },

    #[error("Scan cancelled")]
    Cancelled,
}

impl VerityErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::WorkerFailed { .. } => error_code::WORKER_FAILED,
            Self::Timeout { .. } => error_code::SCAN_TIMEOUT,
            Self::Cancelled => error_code::CANCELLED,
            Self::Spawn { .. } => error_code::SCAN_ERROR,
        }
    }
}
