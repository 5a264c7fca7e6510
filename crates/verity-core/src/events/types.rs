//! Event payloads.

use std::path::Path;

use crate::types::ScanOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStartedEvent {
    pub total_entries: usize,
    pub workers: usize,
}

/// Emitted from worker threads as each file is classified.
#[derive(Debug, Clone, Copy)]
pub struct FileClassifiedEvent<'a> {
    pub worker: usize,
    pub path: &'a Path,
    pub outcome: &'a ScanOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCompletedEvent {
    pub worker: usize,
    pub scanned: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailedEvent {
    pub worker: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCompleteEvent {
    pub scanned: usize,
    pub corrupted: usize,
    pub missing: usize,
    pub duration_ms: u64,
}
