//! Human-readable output, including live per-file status lines.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use verity_core::events::types::{FileClassifiedEvent, ScanCompleteEvent, ScanStartedEvent};
use verity_core::events::ScanEventHandler;
use verity_core::types::{ScanOutcome, UnreadableReason};

/// Shared, line-buffered output. Clones write to the same stream, so worker
/// threads and the main thread never interleave within a line.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    quiet: bool,
}

impl Console {
    pub fn new(writer: impl Write + Send + 'static, quiet: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
            quiet,
        }
    }

    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }

    /// Write without a newline and flush, for progress dots and prompts.
    pub fn write(&self, text: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = write!(out, "{text}");
            let _ = out.flush();
        }
    }

    pub fn line(&self, text: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
        }
    }

    /// Print the status line for one classified file.
    pub fn outcome(&self, path: &Path, outcome: &ScanOutcome) {
        if self.quiet && matches!(outcome, ScanOutcome::Ok | ScanOutcome::Skipped) {
            return;
        }
        let text = status_lines(path, outcome);
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").field("quiet", &self.quiet).finish_non_exhaustive()
    }
}

/// Status text for a file: the status line, plus an explanation line for
/// ignored or diverted files.
pub fn status_lines(path: &Path, outcome: &ScanOutcome) -> String {
    let path = path.display();
    match outcome {
        ScanOutcome::Ok => format!("{path}: OK"),
        ScanOutcome::Skipped => format!("{path}: SKIPPING"),
        ScanOutcome::Missing => format!("{path}: MISSING!!!"),
        ScanOutcome::MissingIgnored { reason } => {
            format!("{path}: MISSING!!!\n{}", reason.explanation())
        }
        ScanOutcome::Corrupted => format!("{path}: CORRUPTED!!!"),
        ScanOutcome::CorruptedDiverted => format!("{path}: CORRUPTED!!!\nHas a diversion. Ignoring..."),
        ScanOutcome::Unreadable {
            reason: UnreadableReason::PermissionDenied,
        } => format!("{path}: PERMISSION DENIED"),
        ScanOutcome::Unreadable {
            reason: UnreadableReason::Other(message),
        } => format!("{path}: UNREADABLE ({message})"),
    }
}

impl ScanEventHandler for Console {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {
        self.line("Scanning...");
    }

    fn on_file_classified(&self, event: &FileClassifiedEvent<'_>) {
        self.outcome(event.path, event.outcome);
    }

    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {
        self.line("\nScan Complete!");
    }
}
