//! Merging partial results into the final report.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use verity_core::types::OutcomeCounts;

use crate::worker::PartialResult;

/// Final result of a scan. Immutable once built; path lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub scanned: usize,
    /// Excludes diverted files.
    pub corrupted: Vec<PathBuf>,
    /// Excludes ignored files.
    pub missing: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    pub counts: OutcomeCounts,
    pub workers: usize,
    pub scan_duration: Duration,
    /// Wall time of the whole run, set by the caller once known.
    pub total_duration: Duration,
}

impl AggregateReport {
    pub fn is_clean(&self) -> bool {
        self.corrupted.is_empty() && self.missing.is_empty()
    }

    /// Paths to hand to remediation: missing first, then corrupted.
    pub fn repair_candidates(&self) -> Vec<PathBuf> {
        self.missing.iter().chain(&self.corrupted).cloned().collect()
    }

    pub fn with_total_duration(mut self, total: Duration) -> Self {
        self.total_duration = total;
        self
    }
}

/// Accumulates partial results in whatever order workers finish.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: AggregateReport,
}

impl ReportBuilder {
    pub fn new(workers: usize) -> Self {
        Self {
            report: AggregateReport {
                workers,
                ..Default::default()
            },
        }
    }

    pub fn merge(&mut self, partial: PartialResult) {
        let report = &mut self.report;
        report.scanned += partial.scanned;
        for outcome in &partial.outcomes {
            report.counts.record(&outcome.outcome);
        }
        report.corrupted.extend(partial.corrupted);
        report.missing.extend(partial.missing);
        report.unreadable.extend(partial.unreadable);
    }

    /// Freeze the report. Sorting makes it independent of merge order.
    pub fn finish(self, scan_duration: Duration) -> AggregateReport {
        let mut report = self.report;
        report.corrupted.sort();
        report.missing.sort();
        report.unreadable.sort();
        report.scan_duration = scan_duration;
        report.total_duration = scan_duration;
        report
    }
}
