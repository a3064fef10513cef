#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # BMS Block Catalog
//!
//! The firmware's shared data blocks and the single global store instance
//! that holds them. Application tasks use the free functions here; the
//! block table, the arena size, and the store's slot count all derive
//! from [`table::DESCRIPTORS`] at compile time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bms_blocks::{init, read, write, CellVoltages};
//!
//! init().unwrap();
//!
//! let mut voltages = CellVoltages::new();
//! voltages.voltage_mv[0] = 3_650;
//! write(&voltages).unwrap();
//!
//! let (copy, snapshot) = read::<CellVoltages>().unwrap();
//! assert_eq!(copy.voltage_mv[0], 3_650);
//! assert_eq!(snapshot.generation.count(), 1);
//! ```

pub mod balancing;
pub mod battery;
pub mod measurement;
pub mod os_tick;
pub mod state;
pub mod table;

pub use bms_db::*;

pub use balancing::*;
pub use measurement::*;
pub use os_tick::SysTickSource;
pub use state::*;
pub use table::{id, ARENA_CAPACITY, BLOCK_COUNT, DESCRIPTORS};

/// The global store type, sized by the block table
pub type FirmwareDatabase = Database<SysTickSource, BLOCK_COUNT, ARENA_CAPACITY>;

static DATABASE: FirmwareDatabase = Database::new(SysTickSource);

/// Register the block table, once, during system init
pub fn init() -> DataResult<()> {
    DATABASE.register(&DESCRIPTORS)
}

/// Register the block table with explicit store tuning
pub fn init_with(config: StoreConfig) -> DataResult<()> {
    DATABASE.register_with(&DESCRIPTORS, config)
}

/// Borrow the global store
pub fn database() -> &'static FirmwareDatabase {
    &DATABASE
}

/// Publish a typed block to the global store
pub fn write<T: BlockData>(value: &T) -> DataResult<()> {
    DATABASE.write_block(value)
}

/// Copy a typed block out of the global store
pub fn read<T: BlockData>() -> DataResult<(T, Snapshot)> {
    DATABASE.read_block()
}

/// Overwrite a block from raw bytes
pub fn write_raw(id: BlockId, bytes: &[u8]) -> DataResult<()> {
    DATABASE.write(id, bytes)
}

/// Copy a block's raw bytes into `dest`
pub fn read_raw(id: BlockId, dest: &mut [u8]) -> DataResult<Snapshot> {
    DATABASE.read(id, dest)
}

/// Age of a block's payload
pub fn age_of(id: BlockId) -> DataResult<Age> {
    DATABASE.age_of(id)
}

/// Registered payload size of a block
pub fn block_size(id: BlockId) -> DataResult<usize> {
    DATABASE.block_size(id)
}

/// Number of registered blocks
pub fn block_count() -> usize {
    DATABASE.block_count()
}

/// Snapshot a block's fault counters
pub fn diagnostics(id: BlockId) -> DataResult<BlockDiag> {
    DATABASE.diagnostics(id)
}

/// Store-wide count of accesses with an unregistered id
pub fn unknown_id_faults() -> u32 {
    DATABASE.unknown_id_faults()
}

/// Zero one block's fault counters
pub fn reset_block_diagnostics(id: BlockId) -> DataResult<()> {
    DATABASE.reset_block_diagnostics(id)
}

/// Zero every fault counter in the store
pub fn reset_diagnostics() {
    DATABASE.reset_diagnostics()
}
