//! Backing storage for block payloads
//!
//! One statically sized byte arena holds every registered block back to
//! back. The bytes are atomic so a reader may copy a region while a
//! preempting writer is storing into it; the seqlock word decides whether
//! the copy is kept. Torn bytes never escape, they are discarded on
//! validation failure.

use core::sync::atomic::{AtomicU8, Ordering};

/// Byte arena with interior mutability on every cell
pub(crate) struct Arena<const CAP: usize> {
    bytes: [AtomicU8; CAP],
}

impl<const CAP: usize> Arena<CAP> {
    /// New zeroed arena
    pub(crate) const fn new() -> Self {
        const ZERO: AtomicU8 = AtomicU8::new(0);
        Self { bytes: [ZERO; CAP] }
    }

    /// Store `src` into the arena at `offset`
    ///
    /// Caller guarantees the region was carved out by registration, so the
    /// slice always fits.
    pub(crate) fn copy_in(&self, offset: usize, src: &[u8]) {
        for (cell, byte) in self.bytes[offset..offset + src.len()].iter().zip(src) {
            cell.store(*byte, Ordering::Relaxed);
        }
    }

    /// Load the region at `offset` into `dst`
    pub(crate) fn copy_out(&self, offset: usize, dst: &mut [u8]) {
        for (byte, cell) in dst.iter_mut().zip(&self.bytes[offset..]) {
            *byte = cell.load(Ordering::Relaxed);
        }
    }

    /// Zero the region at `offset`
    pub(crate) fn zero(&self, offset: usize, len: usize) {
        for cell in &self.bytes[offset..offset + len] {
            cell.store(0, Ordering::Relaxed);
        }
    }
}
