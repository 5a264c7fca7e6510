//! Synchronous fan-out of scan events to registered handlers.

use std::sync::Arc;

use super::handler::ScanEventHandler;
use super::types::*;

/// Wraps a list of handlers and is itself a handler, so the engine only ever
/// sees one.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ScanEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ScanEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler does not stop later handlers from receiving the event.
    fn emit<F: Fn(&dyn ScanEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("scan event handler panicked");
            }
        }
    }
}

impl ScanEventHandler for EventDispatcher {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        self.emit(|h| h.on_scan_started(event));
    }

    fn on_file_classified(&self, event: &FileClassifiedEvent<'_>) {
        self.emit(|h| h.on_file_classified(event));
    }

    fn on_worker_completed(&self, event: &WorkerCompletedEvent) {
        self.emit(|h| h.on_worker_completed(event));
    }

    fn on_worker_failed(&self, event: &WorkerFailedEvent) {
        self.emit(|h| h.on_worker_failed(event));
    }

    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.emit(|h| h.on_scan_complete(event));
    }
}
