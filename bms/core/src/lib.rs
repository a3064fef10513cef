#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # BMS Core
//!
//! Core types, traits, and abstractions for the battery-management data
//! engine. This crate defines the vocabulary shared by the data-block store
//! and the measurement catalog: block identities and descriptors, generation
//! counters, tick time, and the byte-level codec used to move typed blocks
//! through the store.

use core::fmt;

pub mod block;
pub mod codec;
pub mod generation;
pub mod time;

pub use block::*;
pub use generation::*;
pub use time::*;

/// Data engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the data engine
pub type DataResult<T> = Result<T, DataError>;

/// Error types for data engine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    /// Block id is not registered or the caller's buffer size does not
    /// match the registered block size
    InvalidBlock,
    /// Read retries exhausted while a writer kept the block in flux
    Inconsistent,
    /// The block table has already been registered
    AlreadyRegistered,
    /// Malformed block table entry (sparse ids, zero or oversized block)
    BadDescriptor,
    /// Block table exceeds the store's slot or arena capacity
    CapacityExceeded,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::InvalidBlock => write!(f, "Unknown block id or size mismatch"),
            DataError::Inconsistent => write!(f, "Consistent snapshot not obtained"),
            DataError::AlreadyRegistered => write!(f, "Block table already registered"),
            DataError::BadDescriptor => write!(f, "Malformed block descriptor"),
            DataError::CapacityExceeded => write!(f, "Block table exceeds store capacity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DataError {}

#[cfg(feature = "defmt")]
impl defmt::Format for DataError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataError::InvalidBlock => defmt::write!(fmt, "InvalidBlock"),
            DataError::Inconsistent => defmt::write!(fmt, "Inconsistent"),
            DataError::AlreadyRegistered => defmt::write!(fmt, "AlreadyRegistered"),
            DataError::BadDescriptor => defmt::write!(fmt, "BadDescriptor"),
            DataError::CapacityExceeded => defmt::write!(fmt, "CapacityExceeded"),
        }
    }
}
