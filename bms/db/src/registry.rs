//! The static block table
//!
//! Registration happens once, during system init and before the scheduler
//! starts handing the store to tasks. The table maps each dense block id
//! to its region of the arena; after it is published it never changes, so
//! lookups need no locking.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use bms_core::{BlockDescriptor, BlockId, DataError, DataResult, MAX_BLOCK_SIZE};

const STATE_UNREGISTERED: u8 = 0;
const STATE_REGISTERING: u8 = 1;
const STATE_READY: u8 = 2;

/// Immutable-after-publish map from block id to arena region
pub(crate) struct Registry<const NB: usize> {
    state: AtomicU8,
    count: AtomicUsize,
    offsets: [AtomicUsize; NB],
    sizes: [AtomicUsize; NB],
}

impl<const NB: usize> Registry<NB> {
    /// New empty table
    pub(crate) const fn new() -> Self {
        const ZERO: AtomicUsize = AtomicUsize::new(0);
        Self {
            state: AtomicU8::new(STATE_UNREGISTERED),
            count: AtomicUsize::new(0),
            offsets: [ZERO; NB],
            sizes: [ZERO; NB],
        }
    }

    /// Validate `descs` and stage the table, claiming the store
    ///
    /// Returns the total arena bytes the table occupies. The table is not
    /// visible to lookups until [`publish`] runs; a validation failure
    /// leaves the store unclaimed so a corrected table can still register.
    ///
    /// [`publish`]: Registry::publish
    pub(crate) fn stage(
        &self,
        descs: &[BlockDescriptor],
        arena_capacity: usize,
    ) -> DataResult<usize> {
        let total = Self::validate(descs, arena_capacity)?;

        critical_section::with(|_cs| {
            if self.state.load(Ordering::Relaxed) != STATE_UNREGISTERED {
                return Err(DataError::AlreadyRegistered);
            }
            self.state.store(STATE_REGISTERING, Ordering::Relaxed);
            Ok(())
        })?;

        let mut offset = 0;
        for (index, desc) in descs.iter().enumerate() {
            self.offsets[index].store(offset, Ordering::Relaxed);
            self.sizes[index].store(desc.size(), Ordering::Relaxed);
            offset += desc.size();
        }
        self.count.store(descs.len(), Ordering::Relaxed);
        Ok(total)
    }

    /// Publish a staged table, opening the store for access
    pub(crate) fn publish(&self) {
        self.state.store(STATE_READY, Ordering::Release);
    }

    /// Look up a block's arena region as `(offset, size)`
    ///
    /// Returns `None` for ids outside the table and for any id while the
    /// table is not published.
    pub(crate) fn entry(&self, id: BlockId) -> Option<(usize, usize)> {
        if self.state.load(Ordering::Acquire) != STATE_READY {
            return None;
        }
        let index = id.index();
        if index >= self.count.load(Ordering::Relaxed) {
            return None;
        }
        Some((
            self.offsets[index].load(Ordering::Relaxed),
            self.sizes[index].load(Ordering::Relaxed),
        ))
    }

    /// Number of registered blocks, zero before publish
    pub(crate) fn block_count(&self) -> usize {
        if self.state.load(Ordering::Acquire) != STATE_READY {
            return 0;
        }
        self.count.load(Ordering::Relaxed)
    }

    fn validate(descs: &[BlockDescriptor], arena_capacity: usize) -> DataResult<usize> {
        if descs.is_empty() {
            return Err(DataError::BadDescriptor);
        }
        if descs.len() > NB {
            return Err(DataError::CapacityExceeded);
        }
        let mut total = 0usize;
        for (index, desc) in descs.iter().enumerate() {
            // Ids double as table indices, so the table must be dense.
            if desc.id().index() != index {
                return Err(DataError::BadDescriptor);
            }
            if desc.size() == 0 || desc.size() > MAX_BLOCK_SIZE {
                return Err(DataError::BadDescriptor);
            }
            total += desc.size();
        }
        if total > arena_capacity {
            return Err(DataError::CapacityExceeded);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> [BlockDescriptor; 3] {
        [
            BlockDescriptor::new(BlockId::new(0), 8),
            BlockDescriptor::new(BlockId::new(1), 64),
            BlockDescriptor::new(BlockId::new(2), 4),
        ]
    }

    #[test]
    fn staged_table_lays_blocks_back_to_back() {
        let registry: Registry<4> = Registry::new();
        let total = registry.stage(&table(), 128).unwrap();
        registry.publish();

        assert_eq!(total, 76);
        assert_eq!(registry.block_count(), 3);
        assert_eq!(registry.entry(BlockId::new(0)), Some((0, 8)));
        assert_eq!(registry.entry(BlockId::new(1)), Some((8, 64)));
        assert_eq!(registry.entry(BlockId::new(2)), Some((72, 4)));
        assert_eq!(registry.entry(BlockId::new(3)), None);
    }

    #[test]
    fn lookups_fail_until_published() {
        let registry: Registry<4> = Registry::new();
        assert_eq!(registry.entry(BlockId::new(0)), None);
        assert_eq!(registry.block_count(), 0);

        registry.stage(&table(), 128).unwrap();
        assert_eq!(registry.entry(BlockId::new(0)), None);

        registry.publish();
        assert_eq!(registry.entry(BlockId::new(0)), Some((0, 8)));
    }

    #[test]
    fn second_registration_is_rejected() {
        let registry: Registry<4> = Registry::new();
        registry.stage(&table(), 128).unwrap();
        assert_eq!(registry.stage(&table(), 128), Err(DataError::AlreadyRegistered));
    }

    #[test]
    fn sparse_ids_are_rejected() {
        let registry: Registry<4> = Registry::new();
        let sparse = [
            BlockDescriptor::new(BlockId::new(0), 8),
            BlockDescriptor::new(BlockId::new(2), 8),
        ];
        assert_eq!(registry.stage(&sparse, 128), Err(DataError::BadDescriptor));
        // The failed attempt must not have claimed the store.
        assert!(registry.stage(&table(), 128).is_ok());
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        let registry: Registry<4> = Registry::new();
        let empty = [BlockDescriptor::new(BlockId::new(0), 0)];
        assert_eq!(registry.stage(&empty, 128), Err(DataError::BadDescriptor));

        let oversized = [BlockDescriptor::new(BlockId::new(0), MAX_BLOCK_SIZE + 1)];
        assert_eq!(registry.stage(&oversized, 4096), Err(DataError::BadDescriptor));
    }

    #[test]
    fn capacity_limits_are_enforced() {
        let registry: Registry<2> = Registry::new();
        assert_eq!(registry.stage(&table(), 128), Err(DataError::CapacityExceeded));

        let registry: Registry<4> = Registry::new();
        assert_eq!(registry.stage(&table(), 75), Err(DataError::CapacityExceeded));
    }

    #[test]
    fn empty_table_is_rejected() {
        let registry: Registry<4> = Registry::new();
        assert_eq!(registry.stage(&[], 128), Err(DataError::BadDescriptor));
    }
}
