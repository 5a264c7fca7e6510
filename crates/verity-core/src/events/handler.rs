//! ScanEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing a scan.
///
/// Handlers only override the events they care about. `on_file_classified`
/// is called concurrently from every worker thread, hence `Send + Sync`.
pub trait ScanEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_file_classified(&self, _event: &FileClassifiedEvent<'_>) {}
    fn on_worker_completed(&self, _event: &WorkerCompletedEvent) {}
    fn on_worker_failed(&self, _event: &WorkerFailedEvent) {}
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}
}

/// Handler that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHandler;

impl ScanEventHandler for NoOpHandler {}
