#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # BMS Data-Block Store (DB)
//!
//! Central exchange for measurement and state data shared between the
//! firmware's tasks. Producers publish whole blocks (cell voltages, pack
//! current, state requests), consumers copy whole blocks; the store rules
//! out torn data without ever blocking a reader.
//!
//! ## Architecture
//!
//! - A static block table, registered once at init, carves a byte arena
//!   into fixed-size regions (one per block id).
//! - Each block carries a sequence word: odd while a write is in flight,
//!   even when settled. Half the word is the block's public generation.
//! - Writers serialize through a short critical section and stamp every
//!   write with the OS tick. Readers run lock-free with bounded retries.
//! - Monotonic per-block fault counters record discarded read attempts,
//!   exhausted reads, and size-mismatched accesses for the diagnostic
//!   task to sample.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bms_core::{BlockDescriptor, BlockId, TickSource, Tick};
//! use bms_db::Database;
//!
//! struct OsClock;
//! impl TickSource for OsClock {
//!     fn now(&self) -> Tick {
//!         Tick::new(0) // read the RTOS tick counter here
//!     }
//! }
//!
//! static STORE: Database<OsClock, 2, 80> = Database::new(OsClock);
//!
//! let table = [
//!     BlockDescriptor::new(BlockId::new(0), 64),
//!     BlockDescriptor::new(BlockId::new(1), 16),
//! ];
//! STORE.register(&table).unwrap();
//!
//! STORE.write(BlockId::new(0), &[0u8; 64]).unwrap();
//! let mut copy = [0u8; 64];
//! let snapshot = STORE.read(BlockId::new(0), &mut copy).unwrap();
//! assert_eq!(snapshot.generation.count(), 1);
//! ```

mod arena;
mod registry;
mod sequence;

pub mod diag;
pub mod store;

pub use bms_core::*;
pub use diag::BlockDiag;
pub use store::*;
