//! Dispatches one worker thread per chunk and aggregates their results.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvError, Select};
use verity_core::config::ScanConfig;
use verity_core::errors::ScanError;
use verity_core::events::types::{ScanCompleteEvent, ScanStartedEvent, WorkerCompletedEvent, WorkerFailedEvent};
use verity_core::events::{NoOpHandler, ScanEventHandler};
use verity_core::traits::{Cancellable, CancellationToken};
use verity_core::types::Manifest;

use crate::context::ScanContext;
use crate::partition::{available_workers, partition};
use crate::report::{AggregateReport, ReportBuilder};
use crate::worker::{scan_chunk, PartialResult};

/// What a worker sends back: its result, or the panic message if it died.
type WorkerMessage = Result<PartialResult, String>;

/// A dispatched worker the aggregator has not heard from yet.
struct PendingWorker {
    index: usize,
    rx: Receiver<WorkerMessage>,
    handle: JoinHandle<()>,
}

/// Runs a full verification pass over a manifest.
pub struct ScanEngine {
    context: Arc<ScanContext>,
    workers: usize,
    timeout: Duration,
    cancel: Arc<dyn Cancellable>,
    events: Arc<dyn ScanEventHandler>,
}

impl ScanEngine {
    pub fn new(context: ScanContext) -> Self {
        let defaults = ScanConfig::default();
        Self {
            context: Arc::new(context),
            workers: available_workers(defaults.threads),
            timeout: defaults.effective_timeout(),
            cancel: Arc::new(CancellationToken::new()),
            events: Arc::new(NoOpHandler),
        }
    }

    pub fn from_config(context: ScanContext, config: &ScanConfig) -> Self {
        Self::new(context)
            .with_workers(available_workers(config.threads))
            .with_timeout(config.effective_timeout())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: Arc<dyn Cancellable>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn ScanEventHandler>) -> Self {
        self.events = events;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scan every entry of `manifest` and return the merged report.
    ///
    /// Fails if any worker fails, if the deadline passes first, or if the scan
    /// is cancelled. Partial results are discarded in all three cases.
    pub fn run(&self, manifest: Manifest) -> Result<AggregateReport, ScanError> {
        let start = Instant::now();
        let total_entries = manifest.len();
        let chunks = partition(manifest, self.workers);
        let dispatched = chunks.len();

        tracing::info!(entries = total_entries, workers = dispatched, "scan started");
        self.events.on_scan_started(&ScanStartedEvent {
            total_entries,
            workers: dispatched,
        });

        let mut pending = Vec::with_capacity(dispatched);
        for chunk in chunks {
            match self.spawn_worker(chunk) {
                Ok(worker) => pending.push(worker),
                Err(err) => {
                    self.cancel.cancel();
                    return Err(err);
                }
            }
        }

        let deadline = start.checked_add(self.timeout);
        let mut builder = ReportBuilder::new(dispatched);
        let mut failure: Option<ScanError> = None;
        let mut cancelled = false;

        while !pending.is_empty() {
            let (slot, message) = {
                let mut select = Select::new();
                for worker in &pending {
                    select.recv(&worker.rx);
                }
                let selected = match deadline {
                    Some(deadline) => select.select_deadline(deadline),
                    None => Ok(select.select()),
                };
                let Ok(op) = selected else {
                    self.cancel.cancel();
                    tracing::error!(pending = pending.len(), "scan deadline passed");
                    return Err(ScanError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                        pending: pending.len(),
                    });
                };
                let slot = op.index();
                (slot, op.recv(&pending[slot].rx))
            };
            let worker = pending.swap_remove(slot);

            match message {
                Ok(Ok(partial)) => {
                    // The worker has already sent its only message.
                    let _ = worker.handle.join();
                    if partial.cancelled {
                        cancelled = true;
                        continue;
                    }
                    self.events.on_worker_completed(&WorkerCompletedEvent {
                        worker: worker.index,
                        scanned: partial.scanned,
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    });
                    builder.merge(partial);
                }
                Ok(Err(message)) => {
                    let _ = worker.handle.join();
                    self.fail_worker(worker.index, message, &mut failure);
                }
                Err(RecvError) => {
                    self.fail_worker(worker.index, "exited without reporting".to_string(), &mut failure);
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }
        if cancelled || self.cancel.is_cancelled() {
            tracing::info!("scan cancelled, discarding partial results");
            return Err(ScanError::Cancelled);
        }

        let report = builder.finish(start.elapsed());
        tracing::info!(
            scanned = report.scanned,
            corrupted = report.corrupted.len(),
            missing = report.missing.len(),
            elapsed_ms = report.scan_duration.as_millis() as u64,
            "scan complete"
        );
        self.events.on_scan_complete(&ScanCompleteEvent {
            scanned: report.scanned,
            corrupted: report.corrupted.len(),
            missing: report.missing.len(),
            duration_ms: report.scan_duration.as_millis() as u64,
        });
        Ok(report)
    }

    fn spawn_worker(&self, chunk: crate::partition::WorkChunk) -> Result<PendingWorker, ScanError> {
        let index = chunk.index;
        let (tx, rx) = crossbeam_channel::bounded::<WorkerMessage>(1);
        let context = Arc::clone(&self.context);
        let cancel = Arc::clone(&self.cancel);
        let events = Arc::clone(&self.events);

        let handle = thread::Builder::new()
            .name(format!("verity-scan-{index}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    scan_chunk(chunk, &context, cancel.as_ref(), events.as_ref())
                }));
                // The aggregator may have given up on us already.
                let _ = tx.send(result.map_err(panic_message));
            })
            .map_err(|source| ScanError::Spawn { worker: index, source })?;

        tracing::debug!(worker = index, "worker dispatched");
        Ok(PendingWorker { index, rx, handle })
    }

    /// Record a failed worker and stop the others; the first failure is reported.
    fn fail_worker(&self, worker: usize, message: String, failure: &mut Option<ScanError>) {
        tracing::error!(worker, error = %message, "worker failed");
        self.events.on_worker_failed(&WorkerFailedEvent {
            worker,
            message: message.clone(),
        });
        self.cancel.cancel();
        failure.get_or_insert(ScanError::WorkerFailed { worker, message });
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
