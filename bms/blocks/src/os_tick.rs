//! OS tick shim
//!
//! The RTOS tick hook advances a single atomic counter; everything in the
//! firmware that needs wall time in ticks reads it from here. The store
//! samples it through [`SysTickSource`] for write stamps and age queries.

use core::sync::atomic::{AtomicU32, Ordering};

use bms_core::{Tick, TickSource};

static OS_TICK: AtomicU32 = AtomicU32::new(0);

/// Advance the tick counter, called from the RTOS tick hook
pub fn advance(ticks: u32) {
    OS_TICK.fetch_add(ticks, Ordering::Relaxed);
}

/// Current OS tick
pub fn now() -> Tick {
    Tick::new(OS_TICK.load(Ordering::Relaxed))
}

/// Tick source backed by the OS tick counter
pub struct SysTickSource;

impl TickSource for SysTickSource {
    fn now(&self) -> Tick {
        now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_the_clock_forward() {
        let before = now();
        advance(5);
        assert_eq!(now().elapsed_since(before), 5);
        assert_eq!(SysTickSource.now(), now());
    }
}
