//! Block identities, descriptors, and the typed-block trait

use core::fmt;

/// Largest payload a single data block may carry, in bytes
pub const MAX_BLOCK_SIZE: usize = 256;

/// Bounded byte buffer sized for the largest possible block
pub type BlockBytes = heapless::Vec<u8, MAX_BLOCK_SIZE>;

/// Type-safe data block identifier
///
/// Ids are dense: the block table registers ids `0..block_count` and the
/// id doubles as the block's index into the store's bookkeeping tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Create a new block id from a raw value
    pub const fn new(id: u16) -> Self {
        BlockId(id)
    }

    /// Get the raw id value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Get the id as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BlockId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "BlockId({})", self.0);
    }
}

/// One entry of the static block table: an id and a payload size in bytes
///
/// Descriptors are produced once, at compile time, and handed to the store
/// during registration. The store validates them; a descriptor that passed
/// registration never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    id: BlockId,
    size: usize,
}

impl BlockDescriptor {
    /// Create a new block descriptor
    pub const fn new(id: BlockId, size: usize) -> Self {
        Self { id, size }
    }

    /// Get the block id
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Get the payload size in bytes
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Display for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}B", self.id, self.size)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BlockDescriptor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}:{}B", self.id, self.size);
    }
}

/// A typed view of one data block
///
/// Implementors pack themselves into the store's wire layout with [`encode`]
/// and rebuild themselves with [`decode`]. `encode` must produce exactly
/// [`SIZE`] bytes and `decode` must accept exactly that many; the store
/// enforces the length on both paths.
///
/// [`encode`]: BlockData::encode
/// [`decode`]: BlockData::decode
/// [`SIZE`]: BlockData::SIZE
pub trait BlockData: Sized {
    /// Registered id of this block
    const ID: BlockId;

    /// Encoded payload size in bytes
    const SIZE: usize;

    /// Pack the block into its byte layout
    fn encode(&self, out: &mut BlockBytes);

    /// Rebuild the block from its byte layout
    fn decode(bytes: &[u8]) -> Self;
}
