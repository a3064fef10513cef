//! Per-block sequence words
//!
//! Each block carries one 32-bit sequence word. An odd value means a write
//! is in flight, an even value means the block is settled. The public
//! generation counter is the word shifted right by one, so the two writes
//! of a single update (odd on entry, even on commit) advance the
//! generation by exactly one.

use core::sync::atomic::{fence, AtomicU32, Ordering};

use bms_core::Generation;

/// Seqlock word guarding one block's payload
pub(crate) struct SeqCount {
    word: AtomicU32,
}

impl SeqCount {
    /// New settled word at generation zero
    pub(crate) const fn new() -> Self {
        Self {
            word: AtomicU32::new(0),
        }
    }

    /// Reader entry: sample the word before copying the payload
    pub(crate) fn begin_read(&self) -> u32 {
        self.word.load(Ordering::Acquire)
    }

    /// Reader exit: true if the word is unchanged since `started`
    ///
    /// The fence orders the payload loads before the validation load, so a
    /// copy that overlapped any writer activity is always rejected.
    pub(crate) fn validate_read(&self, started: u32) -> bool {
        fence(Ordering::Acquire);
        self.word.load(Ordering::Acquire) == started
    }

    /// Writer entry: mark the block in flux and return the settled word
    ///
    /// Must run with writers serialized (the store holds a critical
    /// section). The release fence orders the odd mark before the payload
    /// stores that follow it.
    pub(crate) fn begin_write(&self) -> u32 {
        let started = self.word.load(Ordering::Relaxed);
        self.word.store(started.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        started
    }

    /// Writer exit: settle the block one generation later
    pub(crate) fn commit_write(&self, started: u32) {
        self.word.store(started.wrapping_add(2), Ordering::Release);
    }

    /// Current raw word, with no ordering guarantee
    pub(crate) fn raw(&self) -> u32 {
        self.word.load(Ordering::Relaxed)
    }

    /// Check whether a sampled word has its in-flux mark set
    pub(crate) fn write_in_progress(word: u32) -> bool {
        word & 1 != 0
    }

    /// Public generation corresponding to a settled word
    pub(crate) fn generation_of(word: u32) -> Generation {
        Generation::new(word >> 1)
    }
}
