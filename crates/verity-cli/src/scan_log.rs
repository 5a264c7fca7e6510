//! Scan events as log records.

use verity_core::events::types::{FileClassifiedEvent, WorkerCompletedEvent};
use verity_core::events::ScanEventHandler;
use verity_core::types::ScanOutcome;

/// Logs per-file outcomes and worker timings. Registered for every scan,
/// alongside the console when output is text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanLog;

impl ScanEventHandler for ScanLog {
    fn on_file_classified(&self, event: &FileClassifiedEvent<'_>) {
        match event.outcome {
            ScanOutcome::Missing | ScanOutcome::Corrupted => tracing::debug!(
                worker = event.worker,
                path = %event.path.display(),
                outcome = %event.outcome,
                "needs repair"
            ),
            outcome => tracing::trace!(
                worker = event.worker,
                path = %event.path.display(),
                outcome = %outcome,
                "classified"
            ),
        }
    }

    fn on_worker_completed(&self, event: &WorkerCompletedEvent) {
        tracing::debug!(
            worker = event.worker,
            scanned = event.scanned,
            elapsed_ms = event.elapsed_ms,
            "worker finished"
        );
    }
}
