//! Access fault counters
//!
//! The store keeps one monotonic counter set per block plus one store-wide
//! counter for accesses that never resolved to a block. Counters only ever
//! increase during operation; they reset to zero exclusively through the
//! explicit reset calls, so a diagnostic task can sample them at its own
//! rate without losing events.

use core::sync::atomic::{AtomicU32, Ordering};

/// Snapshot of one block's fault counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockDiag {
    /// Read attempts discarded because a write overlapped the copy
    pub retries: u32,
    /// Reads that exhausted every attempt without a clean snapshot
    pub inconsistent_reads: u32,
    /// Accesses rejected for a buffer/block size mismatch
    pub size_faults: u32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for BlockDiag {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "BlockDiag{{ retries: {}, inconsistent: {}, size_faults: {} }}",
            self.retries,
            self.inconsistent_reads,
            self.size_faults
        );
    }
}

/// Monotonic fault counters for every block slot
pub(crate) struct DiagCounters<const NB: usize> {
    retries: [AtomicU32; NB],
    inconsistent: [AtomicU32; NB],
    size_faults: [AtomicU32; NB],
    unknown_id: AtomicU32,
}

impl<const NB: usize> DiagCounters<NB> {
    /// New counter set, all zero
    pub(crate) const fn new() -> Self {
        const ZERO: AtomicU32 = AtomicU32::new(0);
        Self {
            retries: [ZERO; NB],
            inconsistent: [ZERO; NB],
            size_faults: [ZERO; NB],
            unknown_id: AtomicU32::new(0),
        }
    }

    /// Count one discarded read attempt on a block
    pub(crate) fn note_retry(&self, index: usize) {
        self.retries[index].fetch_add(1, Ordering::Relaxed);
    }

    /// Count one read that gave up without a clean snapshot
    pub(crate) fn note_inconsistent(&self, index: usize) {
        self.inconsistent[index].fetch_add(1, Ordering::Relaxed);
    }

    /// Count one size-mismatched access on a block
    pub(crate) fn note_size_fault(&self, index: usize) {
        self.size_faults[index].fetch_add(1, Ordering::Relaxed);
    }

    /// Count one access with an id outside the block table
    pub(crate) fn note_unknown_id(&self) {
        self.unknown_id.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot one block's counters
    pub(crate) fn snapshot(&self, index: usize) -> BlockDiag {
        BlockDiag {
            retries: self.retries[index].load(Ordering::Relaxed),
            inconsistent_reads: self.inconsistent[index].load(Ordering::Relaxed),
            size_faults: self.size_faults[index].load(Ordering::Relaxed),
        }
    }

    /// Store-wide count of accesses that resolved to no block
    pub(crate) fn unknown_id_faults(&self) -> u32 {
        self.unknown_id.load(Ordering::Relaxed)
    }

    /// Zero one block's counters
    pub(crate) fn reset_block(&self, index: usize) {
        self.retries[index].store(0, Ordering::Relaxed);
        self.inconsistent[index].store(0, Ordering::Relaxed);
        self.size_faults[index].store(0, Ordering::Relaxed);
    }

    /// Zero every counter, including the unknown-id count
    pub(crate) fn reset_all(&self) {
        for index in 0..NB {
            self.reset_block(index);
        }
        self.unknown_id.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_block() {
        let diag: DiagCounters<2> = DiagCounters::new();
        diag.note_retry(0);
        diag.note_retry(0);
        diag.note_inconsistent(0);
        diag.note_size_fault(1);

        assert_eq!(
            diag.snapshot(0),
            BlockDiag {
                retries: 2,
                inconsistent_reads: 1,
                size_faults: 0,
            }
        );
        assert_eq!(
            diag.snapshot(1),
            BlockDiag {
                size_faults: 1,
                ..BlockDiag::default()
            }
        );
    }

    #[test]
    fn reset_is_explicit_and_scoped() {
        let diag: DiagCounters<2> = DiagCounters::new();
        diag.note_retry(0);
        diag.note_size_fault(1);
        diag.note_unknown_id();

        diag.reset_block(0);
        assert_eq!(diag.snapshot(0), BlockDiag::default());
        // Other counters are untouched by a per-block reset.
        assert_eq!(diag.snapshot(1).size_faults, 1);
        assert_eq!(diag.unknown_id_faults(), 1);

        diag.reset_all();
        assert_eq!(diag.snapshot(1), BlockDiag::default());
        assert_eq!(diag.unknown_id_faults(), 0);
    }
}
