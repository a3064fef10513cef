//! Per-block generation counters

use core::fmt;

/// Number of settled writes a block has received
///
/// A block that has never been written is at generation zero. Every
/// completed write advances the generation by one; the counter wraps
/// on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(pub u32);

impl Generation {
    /// Generation of a never-written block
    pub const ZERO: Self = Self(0);

    /// Create a generation from a raw counter value
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    /// Get the raw counter value
    pub const fn count(self) -> u32 {
        self.0
    }

    /// Check whether the block has ever been written
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The generation after one more settled write
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen:{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Generation {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "gen:{}", self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_generation_means_never_written() {
        assert!(Generation::ZERO.is_zero());
        assert!(!Generation::new(1).is_zero());
    }

    #[test]
    fn next_advances_and_wraps() {
        assert_eq!(Generation::new(41).next(), Generation::new(42));
        assert_eq!(Generation::new(u32::MAX).next(), Generation::ZERO);
    }
}
