//! Scans one chunk and classifies every entry in it.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use verity_core::events::types::FileClassifiedEvent;
use verity_core::events::ScanEventHandler;
use verity_core::traits::Cancellable;
use verity_core::types::{FileOutcome, ManifestEntry, ScanOutcome, UnreadableReason};

use crate::context::ScanContext;
use crate::hasher::FileHasher;
use crate::partition::WorkChunk;

/// Everything one worker learned about its chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    pub worker: usize,
    /// In chunk order.
    pub outcomes: Vec<FileOutcome>,
    /// Entries that were checked; exempt entries are not counted.
    pub scanned: usize,
    pub corrupted: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    /// The worker stopped early; `outcomes` covers only part of the chunk.
    pub cancelled: bool,
}

impl PartialResult {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Default::default()
        }
    }

    pub fn record(&mut self, path: PathBuf, outcome: ScanOutcome) {
        match &outcome {
            ScanOutcome::Skipped => {}
            ScanOutcome::Corrupted => {
                self.scanned += 1;
                self.corrupted.push(path.clone());
            }
            ScanOutcome::Missing => {
                self.scanned += 1;
                self.missing.push(path.clone());
            }
            ScanOutcome::Unreadable { .. } => {
                self.scanned += 1;
                self.unreadable.push(path.clone());
            }
            _ => self.scanned += 1,
        }
        self.outcomes.push(FileOutcome { path, outcome });
    }
}

/// Scan every entry of `chunk`, stopping early if `cancel` fires.
///
/// Each outcome is reported to `events` as soon as it is known.
pub fn scan_chunk(
    chunk: WorkChunk,
    ctx: &ScanContext,
    cancel: &dyn Cancellable,
    events: &dyn ScanEventHandler,
) -> PartialResult {
    let _span = tracing::debug_span!("scan_worker", worker = chunk.index, chunk_len = chunk.len()).entered();

    let mut result = PartialResult::new(chunk.index);
    result.outcomes.reserve(chunk.len());
    let mut hasher = FileHasher::new();

    for entry in chunk.entries {
        if cancel.is_cancelled() {
            tracing::debug!(worker = result.worker, "cancelled, stopping after current file");
            result.cancelled = true;
            break;
        }
        let outcome = classify_entry(&entry, ctx, &mut hasher);
        events.on_file_classified(&FileClassifiedEvent {
            worker: result.worker,
            path: &entry.path,
            outcome: &outcome,
        });
        result.record(entry.path, outcome);
    }

    tracing::debug!(
        worker = result.worker,
        scanned = result.scanned,
        corrupted = result.corrupted.len(),
        missing = result.missing.len(),
        "chunk done"
    );
    result
}

/// Classify a single manifest entry.
pub fn classify_entry(entry: &ManifestEntry, ctx: &ScanContext, hasher: &mut FileHasher) -> ScanOutcome {
    if ctx.exemptions.contains(&entry.path) {
        return ScanOutcome::Skipped;
    }

    match hasher.hash_file(&entry.path) {
        Ok(actual) if actual.eq_ignore_ascii_case(&entry.expected_hash) => ScanOutcome::Ok,
        Ok(actual) => {
            if ctx.diversions.has_diversion(&entry.path) {
                tracing::debug!(path = %entry.path.display(), "digest mismatch on diverted file");
                ScanOutcome::CorruptedDiverted
            } else {
                tracing::debug!(
                    path = %entry.path.display(),
                    expected = %entry.expected_hash,
                    actual = %actual,
                    "digest mismatch"
                );
                ScanOutcome::Corrupted
            }
        }
        Err(e) => classify_read_error(entry, ctx, &e),
    }
}

/// Outcome for an entry whose file could not be opened or read.
pub fn classify_read_error(entry: &ManifestEntry, ctx: &ScanContext, err: &io::Error) -> ScanOutcome {
    match err.kind() {
        // Covers dangling symlinks and files removed after the manifest was read.
        io::ErrorKind::NotFound => match ctx.policy.classify(&entry.path) {
            Some(reason) => ScanOutcome::MissingIgnored { reason },
            None => ScanOutcome::Missing,
        },
        io::ErrorKind::PermissionDenied => {
            tracing::warn!(path = %entry.path.display(), "permission denied, not checked");
            ScanOutcome::Unreadable {
                reason: UnreadableReason::PermissionDenied,
            }
        }
        _ => {
            tracing::warn!(path = %entry.path.display(), error = %err, "read failed, not checked");
            ScanOutcome::Unreadable {
                reason: UnreadableReason::Other(err.to_string()),
            }
        }
    }
}
