//! Splits the manifest into per-worker chunks.

use verity_core::constants::WORKER_HALVING_THRESHOLD;
use verity_core::types::{Manifest, ManifestEntry};

/// A contiguous slice of the manifest owned by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkChunk {
    pub index: usize,
    pub entries: Vec<ManifestEntry>,
}

impl WorkChunk {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Workers to use for `cores` hardware threads.
///
/// Hashing is I/O bound, so past four cores only half of them get a worker
/// to keep contention on the underlying storage down.
pub fn worker_count(cores: usize) -> usize {
    if cores > WORKER_HALVING_THRESHOLD {
        cores.div_ceil(2)
    } else {
        cores.max(1)
    }
}

/// Worker count for this machine, or `threads` verbatim when configured.
pub fn available_workers(threads: Option<usize>) -> usize {
    threads
        .unwrap_or_else(|| {
            let cores = std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1);
            worker_count(cores)
        })
        .max(1)
}

/// Split `manifest` into chunks of `ceil(len / workers)` entries, the last one
/// holding the remainder. Never yields an empty chunk; an empty manifest yields
/// no chunks at all.
pub fn partition(manifest: Manifest, workers: usize) -> Vec<WorkChunk> {
    let total = manifest.len();
    if total == 0 {
        return Vec::new();
    }
    let size = total.div_ceil(workers.max(1));

    let mut chunks = Vec::with_capacity(total.div_ceil(size));
    let mut entries = manifest.into_entries().into_iter();
    loop {
        let chunk: Vec<ManifestEntry> = entries.by_ref().take(size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(WorkChunk {
            index: chunks.len(),
            entries: chunk,
        });
    }
    chunks
}
