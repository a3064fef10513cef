//! The data-block store

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use bms_core::{
    Age, BlockBytes, BlockData, BlockDescriptor, BlockId, DataError, DataResult, Generation, Tick,
    TickSource,
};

use crate::arena::Arena;
use crate::diag::{BlockDiag, DiagCounters};
use crate::registry::Registry;
use crate::sequence::SeqCount;

/// Read attempts per access unless the registration overrides it
pub const DEFAULT_READ_ATTEMPTS: u8 = 4;

/// Store tuning fixed at registration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Copy attempts a read makes before giving up with
    /// [`DataError::Inconsistent`]. Zero is treated as one.
    pub read_attempts: u8,
}

impl StoreConfig {
    /// Default configuration
    pub const DEFAULT: Self = Self {
        read_attempts: DEFAULT_READ_ATTEMPTS,
    };

    /// Create a configuration with an explicit retry budget
    pub const fn new(read_attempts: u8) -> Self {
        Self { read_attempts }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StoreConfig {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StoreConfig{{ read_attempts: {} }}", self.read_attempts);
    }
}

/// Consistency metadata returned with every successful read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Generation the copied payload belongs to
    pub generation: Generation,
    /// Age of the payload at the time of the read
    pub age: Age,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Snapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Snapshot{{ {}, {} }}", self.generation, self.age);
    }
}

/// Central measurement exchange between producer and consumer tasks
///
/// One statically allocated store holds every shared data block of the
/// firmware. Producers overwrite whole blocks, consumers copy whole
/// blocks; there is no queueing and no partial update. Each block is
/// guarded by its own sequence word:
///
/// * A writer enters a critical section, marks the word odd, stores the
///   payload and tick stamp, then settles the word even. Writers are
///   serialized by the critical section; the window is bounded by one
///   block copy.
/// * A reader never blocks and never enters the critical section. It
///   samples the word, copies the payload, and keeps the copy only if
///   the word never moved. A bounded number of attempts guards against
///   livelock under pathological write rates.
///
/// `NB` is the number of block slots, `CAP` the arena capacity in bytes.
/// Both are sized by the block table the firmware registers at init.
pub struct Database<C, const NB: usize, const CAP: usize> {
    clock: C,
    registry: Registry<NB>,
    arena: Arena<CAP>,
    seq: [SeqCount; NB],
    stamps: [AtomicU32; NB],
    attempts: AtomicU8,
    diag: DiagCounters<NB>,
}

impl<C: TickSource, const NB: usize, const CAP: usize> Database<C, NB, CAP> {
    /// Create an empty store around a tick source
    ///
    /// The store is inert until [`register`] installs the block table.
    ///
    /// [`register`]: Database::register
    pub const fn new(clock: C) -> Self {
        const SEQ: SeqCount = SeqCount::new();
        const STAMP: AtomicU32 = AtomicU32::new(0);
        Self {
            clock,
            registry: Registry::new(),
            arena: Arena::new(),
            seq: [SEQ; NB],
            stamps: [STAMP; NB],
            attempts: AtomicU8::new(DEFAULT_READ_ATTEMPTS),
            diag: DiagCounters::new(),
        }
    }

    /// Install the block table with the default configuration
    pub fn register(&self, descs: &[BlockDescriptor]) -> DataResult<()> {
        self.register_with(descs, StoreConfig::DEFAULT)
    }

    /// Install the block table, once, before tasks start accessing the store
    ///
    /// Validates the table, zeroes the arena region it occupies, then
    /// publishes it. Every block starts zero-filled at generation zero
    /// with infinite age. A second registration attempt is rejected with
    /// [`DataError::AlreadyRegistered`].
    pub fn register_with(&self, descs: &[BlockDescriptor], config: StoreConfig) -> DataResult<()> {
        let total = self.registry.stage(descs, CAP)?;
        self.arena.zero(0, total);
        self.attempts.store(config.read_attempts, Ordering::Relaxed);
        self.registry.publish();
        Ok(())
    }

    /// Overwrite a block with a new payload
    ///
    /// `bytes` must be exactly the registered block size. The copy and the
    /// tick stamp land inside one critical section, so a settled block is
    /// always a whole payload from a single writer, stamped with its write
    /// tick.
    pub fn write(&self, id: BlockId, bytes: &[u8]) -> DataResult<()> {
        let (offset, size) = self.lookup(id)?;
        if bytes.len() != size {
            self.diag.note_size_fault(id.index());
            return Err(DataError::InvalidBlock);
        }
        let index = id.index();
        critical_section::with(|_cs| {
            let started = self.seq[index].begin_write();
            self.arena.copy_in(offset, bytes);
            self.stamps[index].store(self.clock.now().ticks(), Ordering::Relaxed);
            self.seq[index].commit_write(started);
        });
        Ok(())
    }

    /// Copy a block's current payload into `dest`
    ///
    /// `dest` must be exactly the registered block size. The copy runs
    /// outside any critical section and is validated against the block's
    /// sequence word; a copy that overlapped a write is discarded and
    /// retried. When every attempt is dirty the read fails with
    /// [`DataError::Inconsistent`] and `dest` holds an unspecified
    /// mixture, which the caller must not use.
    pub fn read(&self, id: BlockId, dest: &mut [u8]) -> DataResult<Snapshot> {
        let (offset, size) = self.lookup(id)?;
        if dest.len() != size {
            self.diag.note_size_fault(id.index());
            return Err(DataError::InvalidBlock);
        }
        let index = id.index();
        let seq = &self.seq[index];
        for _ in 0..self.read_attempts() {
            let started = seq.begin_read();
            if SeqCount::write_in_progress(started) {
                self.diag.note_retry(index);
                continue;
            }
            self.arena.copy_out(offset, dest);
            let stamp = self.stamps[index].load(Ordering::Relaxed);
            if seq.validate_read(started) {
                let age = if started == 0 {
                    Age::Infinite
                } else {
                    Age::Ticks(self.clock.now().elapsed_since(Tick::new(stamp)))
                };
                return Ok(Snapshot {
                    generation: SeqCount::generation_of(started),
                    age,
                });
            }
            self.diag.note_retry(index);
        }
        self.diag.note_inconsistent(index);
        Err(DataError::Inconsistent)
    }

    /// Encode a typed block and write it
    pub fn write_block<T: BlockData>(&self, value: &T) -> DataResult<()> {
        let mut bytes = BlockBytes::new();
        value.encode(&mut bytes);
        self.write(T::ID, &bytes)
    }

    /// Read a block and decode it into its typed form
    pub fn read_block<T: BlockData>(&self) -> DataResult<(T, Snapshot)> {
        let mut bytes = BlockBytes::new();
        bytes
            .resize(T::SIZE, 0)
            .map_err(|_| DataError::InvalidBlock)?;
        let snapshot = self.read(T::ID, &mut bytes)?;
        Ok((T::decode(&bytes), snapshot))
    }

    /// Age of a block's payload without copying it
    ///
    /// Returns [`Age::Infinite`] until the block's first write settles.
    /// The answer is advisory while a write is in flight; callers that
    /// need the age tied to a payload use the [`Snapshot`] a read returns.
    pub fn age_of(&self, id: BlockId) -> DataResult<Age> {
        let _ = self.lookup(id)?;
        let index = id.index();
        let word = self.seq[index].begin_read();
        // Word 0 is a never-written block, word 1 its first write still
        // in flight; neither has a settled stamp to measure from.
        if word < 2 {
            return Ok(Age::Infinite);
        }
        let stamp = self.stamps[index].load(Ordering::Relaxed);
        Ok(Age::Ticks(self.clock.now().elapsed_since(Tick::new(stamp))))
    }

    /// Registered payload size of a block, in bytes
    pub fn block_size(&self, id: BlockId) -> DataResult<usize> {
        self.lookup(id).map(|(_, size)| size)
    }

    /// Number of registered blocks, zero before registration
    pub fn block_count(&self) -> usize {
        self.registry.block_count()
    }

    /// Snapshot a block's fault counters
    pub fn diagnostics(&self, id: BlockId) -> DataResult<BlockDiag> {
        let _ = self.lookup(id)?;
        Ok(self.diag.snapshot(id.index()))
    }

    /// Store-wide count of accesses with an unregistered id
    pub fn unknown_id_faults(&self) -> u32 {
        self.diag.unknown_id_faults()
    }

    /// Zero one block's fault counters
    pub fn reset_block_diagnostics(&self, id: BlockId) -> DataResult<()> {
        let _ = self.lookup(id)?;
        self.diag.reset_block(id.index());
        Ok(())
    }

    /// Zero every fault counter in the store
    pub fn reset_diagnostics(&self) {
        self.diag.reset_all();
    }

    /// The tick source the store samples for stamps and ages
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn read_attempts(&self) -> u8 {
        let attempts = self.attempts.load(Ordering::Relaxed);
        if attempts == 0 {
            1
        } else {
            attempts
        }
    }

    fn lookup(&self, id: BlockId) -> DataResult<(usize, usize)> {
        match self.registry.entry(id) {
            Some(region) => Ok(region),
            None => {
                self.diag.note_unknown_id();
                Err(DataError::InvalidBlock)
            }
        }
    }
}
