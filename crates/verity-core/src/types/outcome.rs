//! Per-file scan classification.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which noise filter suppressed a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    ManPage,
    Locale,
    Help,
}

impl IgnoreReason {
    /// Human explanation printed under the MISSING line.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::ManPage => "File is man page. Not concerned...",
            Self::Locale => "File is translation/locale file. Not concerned...",
            Self::Help => "File is likely help documentation. Not concerned...",
        }
    }
}

/// Why a file could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum UnreadableReason {
    PermissionDenied,
    Other(String),
}

impl fmt::Display for UnreadableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

/// Classification of one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanOutcome {
    Ok,
    Missing,
    MissingIgnored { reason: IgnoreReason },
    Corrupted,
    CorruptedDiverted,
    Skipped,
    Unreadable { reason: UnreadableReason },
}

impl ScanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Missing => "MISSING",
            Self::MissingIgnored { .. } => "MISSING_IGNORED",
            Self::Corrupted => "CORRUPTED",
            Self::CorruptedDiverted => "CORRUPTED_DIVERTED",
            Self::Skipped => "SKIPPED",
            Self::Unreadable { .. } => "UNREADABLE",
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: ScanOutcome,
}

/// Tally of outcomes by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub ok: usize,
    pub missing: usize,
    pub missing_ignored: usize,
    pub corrupted: usize,
    pub corrupted_diverted: usize,
    pub skipped: usize,
    pub unreadable: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Ok => self.ok += 1,
            ScanOutcome::Missing => self.missing += 1,
            ScanOutcome::MissingIgnored { .. } => self.missing_ignored += 1,
            ScanOutcome::Corrupted => self.corrupted += 1,
            ScanOutcome::CorruptedDiverted => self.corrupted_diverted += 1,
            ScanOutcome::Skipped => self.skipped += 1,
            ScanOutcome::Unreadable { .. } => self.unreadable += 1,
        }
    }

    /// Number of classified entries, skipped ones included.
    pub fn total(&self) -> usize {
        self.ok
            + self.missing
            + self.missing_ignored
            + self.corrupted
            + self.corrupted_diverted
            + self.skipped
            + self.unreadable
    }
}
