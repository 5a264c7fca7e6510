//! Data model: manifest entries, exemptions, per-file outcomes.

pub mod collections;
pub mod manifest;
pub mod outcome;

pub use collections::{FxHashMap, FxHashSet};
pub use manifest::{ExemptionSet, Manifest, ManifestEntry};
pub use outcome::{FileOutcome, IgnoreReason, OutcomeCounts, ScanOutcome, UnreadableReason};
