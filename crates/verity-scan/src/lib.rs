//! Parallel verification engine.
//!
//! The manifest is split into chunks ([`partition`]), each chunk is scanned on
//! its own thread ([`worker`]), and the [`scheduler`] merges the partial results
//! into one [`AggregateReport`] regardless of the order workers finish in.

pub mod context;
pub mod hasher;
pub mod partition;
pub mod policy;
pub mod report;
pub mod scheduler;
pub mod worker;

pub use context::ScanContext;
pub use partition::{available_workers, partition, worker_count, WorkChunk};
pub use policy::IgnorePolicy;
pub use report::{AggregateReport, ReportBuilder};
pub use scheduler::ScanEngine;
pub use worker::{scan_chunk, PartialResult};
