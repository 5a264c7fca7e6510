use std::path::PathBuf;
use std::time::Duration;

use proptest::prelude::*;
use verity_core::types::{IgnoreReason, Manifest, ManifestEntry, ScanOutcome};
use verity_scan::{partition, worker_count, PartialResult, ReportBuilder, WorkChunk};

fn manifest(n: usize) -> Manifest {
    (0..n)
        .map(|i| ManifestEntry::new(format!("/usr/lib/p{i:05}"), "00"))
        .collect()
}

fn outcome(code: u8) -> ScanOutcome {
    match code % 5 {
        0 => ScanOutcome::Ok,
        1 => ScanOutcome::Missing,
        2 => ScanOutcome::Corrupted,
        3 => ScanOutcome::Skipped,
        _ => ScanOutcome::MissingIgnored {
            reason: IgnoreReason::Locale,
        },
    }
}

/// One partial result per chunk, outcomes taken from `codes` in manifest order.
fn partials(chunks: &[WorkChunk], codes: &[u8]) -> Vec<PartialResult> {
    let mut codes = codes.iter().copied();
    chunks
        .iter()
        .map(|chunk| {
            let mut partial = PartialResult::new(chunk.index);
            for entry in &chunk.entries {
                partial.record(entry.path.clone(), outcome(codes.next().unwrap_or(0)));
            }
            partial
        })
        .collect()
}

proptest! {
    #[test]
    fn chunks_cover_manifest_exactly(n in 0usize..300, workers in 1usize..33) {
        let expected: Vec<PathBuf> = manifest(n).iter().map(|e| e.path.clone()).collect();
        let chunks = partition(manifest(n), workers);

        prop_assert!(chunks.len() <= workers);
        prop_assert!(chunks.iter().all(|c| !c.is_empty()));

        let flattened: Vec<PathBuf> = chunks
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| e.path.clone()))
            .collect();
        prop_assert_eq!(flattened, expected);
    }

    #[test]
    fn only_last_chunk_is_short(n in 1usize..300, workers in 1usize..33) {
        let chunks = partition(manifest(n), workers);
        let size = n.div_ceil(workers);
        for chunk in &chunks[..chunks.len() - 1] {
            prop_assert_eq!(chunk.len(), size);
        }
        prop_assert!(chunks[chunks.len() - 1].len() <= size);
    }

    #[test]
    fn worker_count_stays_within_cores(cores in 1usize..512) {
        let workers = worker_count(cores);
        prop_assert!(workers >= 1);
        prop_assert!(workers <= cores);
    }

    #[test]
    fn merge_order_does_not_matter(
        codes in prop::collection::vec(any::<u8>(), 0..120),
        workers in 1usize..9,
        rotation in any::<usize>(),
    ) {
        let chunks = partition(manifest(codes.len()), workers);
        let in_order = partials(&chunks, &codes);
        let mut shuffled = in_order.clone();
        if !shuffled.is_empty() {
            let by = rotation % shuffled.len();
            shuffled.rotate_left(by);
            shuffled.reverse();
        }
        let scanned: usize = in_order.iter().map(|p| p.scanned).sum();
        let missing: usize = in_order.iter().map(|p| p.missing.len()).sum();
        let corrupted: usize = in_order.iter().map(|p| p.corrupted.len()).sum();

        let mut a = ReportBuilder::new(chunks.len());
        for p in in_order {
            a.merge(p);
        }
        let mut b = ReportBuilder::new(chunks.len());
        for p in shuffled {
            b.merge(p);
        }

        let a = a.finish(Duration::ZERO);
        let b = b.finish(Duration::ZERO);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.counts.total(), codes.len());
        prop_assert_eq!(a.scanned, scanned);
        prop_assert_eq!(a.missing.len(), missing);
        prop_assert_eq!(a.corrupted.len(), corrupted);
    }
}
