//! The firmware's static block table
//!
//! Ids are dense and double as indices into the store; the descriptor
//! order below is the id order. Adding a block means adding its id, its
//! descriptor row, and nothing else: the arena capacity follows the
//! table at compile time.

use bms_core::{BlockData, BlockDescriptor};

use crate::balancing::{BalancingControl, BalancingFeedback};
use crate::measurement::{CellTemperatures, CellVoltages, MinMax, PackCurrent};
use crate::state::{ErrorFlags, StateOfCharge, StateRequest, SystemState};

/// Block ids of the firmware's shared data
pub mod id {
    use bms_core::BlockId;

    /// Cell voltages from the measurement task
    pub const CELL_VOLTAGES: BlockId = BlockId::new(0);
    /// Cell temperatures from the measurement task
    pub const CELL_TEMPERATURES: BlockId = BlockId::new(1);
    /// Pack current sensor readings
    pub const PACK_CURRENT: BlockId = BlockId::new(2);
    /// Pack-wide voltage and temperature extremes
    pub const MIN_MAX: BlockId = BlockId::new(3);
    /// State-of-charge estimate
    pub const STATE_OF_CHARGE: BlockId = BlockId::new(4);
    /// Mode request for the system state machine
    pub const STATE_REQUEST: BlockId = BlockId::new(5);
    /// Published mode of the system state machine
    pub const SYSTEM_STATE: BlockId = BlockId::new(6);
    /// Latched error conditions
    pub const ERROR_FLAGS: BlockId = BlockId::new(7);
    /// Balancing commands for the slave boards
    pub const BALANCING_CONTROL: BlockId = BlockId::new(8);
    /// Balancing feedback from the slave boards
    pub const BALANCING_FEEDBACK: BlockId = BlockId::new(9);
}

/// Number of registered blocks
pub const BLOCK_COUNT: usize = 10;

/// The block table handed to the store at init
pub const DESCRIPTORS: [BlockDescriptor; BLOCK_COUNT] = [
    BlockDescriptor::new(id::CELL_VOLTAGES, CellVoltages::SIZE),
    BlockDescriptor::new(id::CELL_TEMPERATURES, CellTemperatures::SIZE),
    BlockDescriptor::new(id::PACK_CURRENT, PackCurrent::SIZE),
    BlockDescriptor::new(id::MIN_MAX, MinMax::SIZE),
    BlockDescriptor::new(id::STATE_OF_CHARGE, StateOfCharge::SIZE),
    BlockDescriptor::new(id::STATE_REQUEST, StateRequest::SIZE),
    BlockDescriptor::new(id::SYSTEM_STATE, SystemState::SIZE),
    BlockDescriptor::new(id::ERROR_FLAGS, ErrorFlags::SIZE),
    BlockDescriptor::new(id::BALANCING_CONTROL, BalancingControl::SIZE),
    BlockDescriptor::new(id::BALANCING_FEEDBACK, BalancingFeedback::SIZE),
];

/// Arena bytes the block table occupies
pub const ARENA_CAPACITY: usize = total_size(&DESCRIPTORS);

const fn total_size(descs: &[BlockDescriptor]) -> usize {
    let mut sum = 0;
    let mut index = 0;
    while index < descs.len() {
        sum += descs[index].size();
        index += 1;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use bms_core::MAX_BLOCK_SIZE;

    #[test]
    fn table_ids_are_dense_and_ordered() {
        assert_eq!(DESCRIPTORS.len(), BLOCK_COUNT);
        for (index, desc) in DESCRIPTORS.iter().enumerate() {
            assert_eq!(desc.id().index(), index);
        }
    }

    #[test]
    fn every_block_fits_the_store() {
        for desc in &DESCRIPTORS {
            assert!(desc.size() > 0);
            assert!(desc.size() <= MAX_BLOCK_SIZE);
        }
        assert_eq!(
            ARENA_CAPACITY,
            DESCRIPTORS.iter().map(|desc| desc.size()).sum::<usize>()
        );
    }

    #[test]
    fn typed_sizes_match_their_descriptors() {
        assert_eq!(
            DESCRIPTORS[id::CELL_VOLTAGES.index()].size(),
            CellVoltages::SIZE
        );
        assert_eq!(
            DESCRIPTORS[id::BALANCING_CONTROL.index()].size(),
            BalancingControl::SIZE
        );
        assert_eq!(CellVoltages::SIZE, 52);
        assert_eq!(CellTemperatures::SIZE, 36);
        assert_eq!(ARENA_CAPACITY, 167);
    }
}
