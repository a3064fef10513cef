//! Passive balancing control and feedback blocks

use bms_core::{codec, BlockBytes, BlockData, BlockId};

use crate::battery::{NR_OF_CELLS, NR_OF_MODULES};
use crate::table::id;

/// Balancing commands for the slave boards
///
/// The balancing task publishes which bleed resistors to switch on; the
/// slave driver consumes the block on its next communication cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancingControl {
    /// Per-cell bleed command, nonzero switches the resistor on
    pub bleed_on: [u8; NR_OF_CELLS],
    /// Cells above `lowest cell + threshold` are balancing candidates, in mV
    pub threshold_mv: u16,
    /// Master switch, zero forces every bleed resistor off
    pub enabled: u8,
}

impl BalancingControl {
    /// New block with balancing disabled and all resistors off
    pub const fn new() -> Self {
        Self {
            bleed_on: [0; NR_OF_CELLS],
            threshold_mv: 0,
            enabled: 0,
        }
    }

    /// Check whether a cell's bleed resistor is commanded on
    pub const fn cell_active(&self, cell: usize) -> bool {
        self.enabled != 0 && self.bleed_on[cell] != 0
    }

    /// Number of cells commanded to bleed
    pub fn active_count(&self) -> usize {
        if self.enabled == 0 {
            return 0;
        }
        self.bleed_on.iter().filter(|on| **on != 0).count()
    }
}

impl Default for BalancingControl {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockData for BalancingControl {
    const ID: BlockId = id::BALANCING_CONTROL;
    const SIZE: usize = NR_OF_CELLS + 2 + 1;

    fn encode(&self, out: &mut BlockBytes) {
        for on in &self.bleed_on {
            codec::put_u8(out, *on);
        }
        codec::put_u16(out, self.threshold_mv);
        codec::put_u8(out, self.enabled);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut block = Self::new();
        let mut at = 0;
        for on in block.bleed_on.iter_mut() {
            *on = codec::get_u8(bytes, at);
            at += 1;
        }
        block.threshold_mv = codec::get_u16(bytes, at);
        block.enabled = codec::get_u8(bytes, at + 2);
        block
    }
}

/// Bleed channels the slave boards report as actually conducting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalancingFeedback {
    /// Per-module mask of conducting channels, bit n is cell n
    pub active: [u16; NR_OF_MODULES],
}

impl BalancingFeedback {
    /// New block with no channel conducting
    pub const fn new() -> Self {
        Self {
            active: [0; NR_OF_MODULES],
        }
    }

    /// Check whether a channel reports as conducting
    pub const fn channel_active(&self, module: usize, cell: usize) -> bool {
        self.active[module] & (1 << cell) != 0
    }
}

impl BlockData for BalancingFeedback {
    const ID: BlockId = id::BALANCING_FEEDBACK;
    const SIZE: usize = 2 * NR_OF_MODULES;

    fn encode(&self, out: &mut BlockBytes) {
        for mask in &self.active {
            codec::put_u16(out, *mask);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut block = Self::new();
        let mut at = 0;
        for mask in block.active.iter_mut() {
            *mask = codec::get_u16(bytes, at);
            at += 2;
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_control_reports_no_active_cells() {
        let mut control = BalancingControl::new();
        control.bleed_on[5] = 1;
        control.bleed_on[17] = 1;
        assert_eq!(control.active_count(), 0);
        assert!(!control.cell_active(5));

        control.enabled = 1;
        assert_eq!(control.active_count(), 2);
        assert!(control.cell_active(5));
        assert!(!control.cell_active(6));
    }

    #[test]
    fn control_block_packs_and_unpacks() {
        let mut control = BalancingControl::new();
        control.bleed_on[0] = 1;
        control.threshold_mv = 25;
        control.enabled = 1;

        let mut bytes = BlockBytes::new();
        control.encode(&mut bytes);
        assert_eq!(bytes.len(), BalancingControl::SIZE);
        assert_eq!(BalancingControl::decode(&bytes), control);
    }

    #[test]
    fn feedback_masks_are_per_module() {
        let mut feedback = BalancingFeedback::new();
        feedback.active[1] = 1 << 4;
        assert!(feedback.channel_active(1, 4));
        assert!(!feedback.channel_active(0, 4));
    }
}
