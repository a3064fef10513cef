//! Tick time and data age

use core::fmt;

/// System tick counter value, in OS ticks (1 ms per tick)
///
/// Ticks come from the RTOS tick interrupt and wrap after `u32::MAX`
/// milliseconds (about 49.7 days). All arithmetic is wrapping, so ages
/// stay correct across the rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick(u32);

impl Tick {
    /// Zero tick
    pub const ZERO: Self = Self(0);

    /// Create a new tick count
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Get the raw tick value
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Calculate elapsed ticks since a previous tick
    pub fn elapsed_since(self, previous: Tick) -> u32 {
        self.0.wrapping_sub(previous.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick:{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Tick {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "tick:{}", self.0);
    }
}

/// Age of a block's data, measured from its last settled write
///
/// A block that has never been written has no write to measure from, so
/// its age is [`Age::Infinite`]. Freshness policy lives with the caller;
/// the store only reports the raw age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    /// The block has never been written
    Infinite,
    /// Ticks elapsed since the last settled write
    Ticks(u32),
}

impl Age {
    /// Check whether the block has never been written
    pub const fn is_infinite(self) -> bool {
        matches!(self, Age::Infinite)
    }

    /// Get the elapsed ticks, if the block has ever been written
    pub const fn ticks(self) -> Option<u32> {
        match self {
            Age::Infinite => None,
            Age::Ticks(t) => Some(t),
        }
    }

    /// Check whether the age exceeds a staleness limit
    ///
    /// Never-written data exceeds every limit.
    pub const fn exceeds(self, limit: u32) -> bool {
        match self {
            Age::Infinite => true,
            Age::Ticks(t) => t > limit,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Infinite => write!(f, "never written"),
            Age::Ticks(t) => write!(f, "{}ticks old", t),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Age {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Age::Infinite => defmt::write!(fmt, "never written"),
            Age::Ticks(t) => defmt::write!(fmt, "{}ticks old", t),
        }
    }
}

/// Source of the current system tick
///
/// The store samples this on every write (to stamp the block) and on every
/// age query. Firmware hands the store a source backed by the RTOS tick
/// counter; tests substitute a controllable fake.
pub trait TickSource {
    /// Current system tick
    fn now(&self) -> Tick;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_handles_tick_rollover() {
        let before = Tick::new(u32::MAX - 1);
        let after = Tick::new(3);
        assert_eq!(after.elapsed_since(before), 5);
    }

    #[test]
    fn age_exceeds_applies_limit() {
        assert!(Age::Infinite.exceeds(u32::MAX));
        assert!(Age::Ticks(101).exceeds(100));
        assert!(!Age::Ticks(100).exceeds(100));
    }

    #[test]
    fn age_ticks_accessor() {
        assert_eq!(Age::Infinite.ticks(), None);
        assert_eq!(Age::Ticks(7).ticks(), Some(7));
    }
}
