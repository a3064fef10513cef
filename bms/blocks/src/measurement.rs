//! Measurement blocks published by the sensing tasks

use bms_core::{codec, BlockBytes, BlockData, BlockId};

use crate::battery::{NR_OF_CELLS, NR_OF_MODULES, NR_OF_TEMP_SENSORS};
use crate::table::id;

/// Cell voltages for the whole pack, in mV
///
/// The measurement task publishes this block once per acquisition cycle.
/// `fault_mask` carries one bit per cell and module: a set bit marks a
/// reading that failed plausibility and must not feed control decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellVoltages {
    /// Cell voltages in mV, module-major order
    pub voltage_mv: [u16; NR_OF_CELLS],
    /// Per-module mask of implausible cells, bit n is cell n of the module
    pub fault_mask: [u16; NR_OF_MODULES],
}

impl CellVoltages {
    /// New block with all voltages zero and no faults flagged
    pub const fn new() -> Self {
        Self {
            voltage_mv: [0; NR_OF_CELLS],
            fault_mask: [0; NR_OF_MODULES],
        }
    }

    /// Check whether a cell's reading passed plausibility
    pub const fn cell_ok(&self, module: usize, cell: usize) -> bool {
        self.fault_mask[module] & (1 << cell) == 0
    }

    /// Flag a cell's reading as implausible
    pub fn flag_cell(&mut self, module: usize, cell: usize) {
        self.fault_mask[module] |= 1 << cell;
    }

    /// Sum of all cell voltages, in mV
    pub fn pack_voltage_mv(&self) -> u32 {
        self.voltage_mv.iter().map(|mv| u32::from(*mv)).sum()
    }
}

impl Default for CellVoltages {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockData for CellVoltages {
    const ID: BlockId = id::CELL_VOLTAGES;
    const SIZE: usize = 2 * NR_OF_CELLS + 2 * NR_OF_MODULES;

    fn encode(&self, out: &mut BlockBytes) {
        for mv in &self.voltage_mv {
            codec::put_u16(out, *mv);
        }
        for mask in &self.fault_mask {
            codec::put_u16(out, *mask);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut block = Self::new();
        let mut at = 0;
        for mv in block.voltage_mv.iter_mut() {
            *mv = codec::get_u16(bytes, at);
            at += 2;
        }
        for mask in block.fault_mask.iter_mut() {
            *mask = codec::get_u16(bytes, at);
            at += 2;
        }
        block
    }
}

/// Cell temperatures for the whole pack, in 0.1 degC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTemperatures {
    /// Sensor temperatures in deci-degC, module-major order
    pub temperature_ddegc: [i16; NR_OF_TEMP_SENSORS],
    /// Per-module mask of implausible sensors
    pub fault_mask: [u16; NR_OF_MODULES],
}

impl CellTemperatures {
    /// New block with all temperatures zero and no faults flagged
    pub const fn new() -> Self {
        Self {
            temperature_ddegc: [0; NR_OF_TEMP_SENSORS],
            fault_mask: [0; NR_OF_MODULES],
        }
    }

    /// Check whether a sensor's reading passed plausibility
    pub const fn sensor_ok(&self, module: usize, sensor: usize) -> bool {
        self.fault_mask[module] & (1 << sensor) == 0
    }

    /// Flag a sensor's reading as implausible
    pub fn flag_sensor(&mut self, module: usize, sensor: usize) {
        self.fault_mask[module] |= 1 << sensor;
    }
}

impl Default for CellTemperatures {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockData for CellTemperatures {
    const ID: BlockId = id::CELL_TEMPERATURES;
    const SIZE: usize = 2 * NR_OF_TEMP_SENSORS + 2 * NR_OF_MODULES;

    fn encode(&self, out: &mut BlockBytes) {
        for temp in &self.temperature_ddegc {
            codec::put_i16(out, *temp);
        }
        for mask in &self.fault_mask {
            codec::put_u16(out, *mask);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut block = Self::new();
        let mut at = 0;
        for temp in block.temperature_ddegc.iter_mut() {
            *temp = codec::get_i16(bytes, at);
            at += 2;
        }
        for mask in block.fault_mask.iter_mut() {
            *mask = codec::get_u16(bytes, at);
            at += 2;
        }
        block
    }
}

/// Pack-level readings from the current sensor
///
/// Sign convention: discharge current is positive, charge current
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackCurrent {
    /// Pack current in mA
    pub current_ma: i32,
    /// Pack voltages measured at the sensor's three taps, in mV
    pub pack_voltage_mv: [i32; 3],
    /// Instantaneous pack power in W
    pub power_w: i32,
}

impl PackCurrent {
    /// New zeroed block
    pub const fn new() -> Self {
        Self {
            current_ma: 0,
            pack_voltage_mv: [0; 3],
            power_w: 0,
        }
    }

    /// Check whether the pack is being charged
    pub const fn is_charging(&self) -> bool {
        self.current_ma < 0
    }
}

impl BlockData for PackCurrent {
    const ID: BlockId = id::PACK_CURRENT;
    const SIZE: usize = 4 + 4 * 3 + 4;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_i32(out, self.current_ma);
        for mv in &self.pack_voltage_mv {
            codec::put_i32(out, *mv);
        }
        codec::put_i32(out, self.power_w);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            current_ma: codec::get_i32(bytes, 0),
            pack_voltage_mv: [
                codec::get_i32(bytes, 4),
                codec::get_i32(bytes, 8),
                codec::get_i32(bytes, 12),
            ],
            power_w: codec::get_i32(bytes, 16),
        }
    }
}

/// Pack-wide voltage and temperature extremes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinMax {
    /// Lowest cell voltage in mV
    pub voltage_min_mv: u16,
    /// Highest cell voltage in mV
    pub voltage_max_mv: u16,
    /// Mean cell voltage in mV
    pub voltage_mean_mv: u16,
    /// Pack-wide index of the lowest cell
    pub voltage_min_cell: u8,
    /// Pack-wide index of the highest cell
    pub voltage_max_cell: u8,
    /// Lowest sensor temperature in deci-degC
    pub temperature_min_ddegc: i16,
    /// Highest sensor temperature in deci-degC
    pub temperature_max_ddegc: i16,
    /// Mean sensor temperature in deci-degC
    pub temperature_mean_ddegc: i16,
}

impl MinMax {
    /// New zeroed block
    pub const fn new() -> Self {
        Self {
            voltage_min_mv: 0,
            voltage_max_mv: 0,
            voltage_mean_mv: 0,
            voltage_min_cell: 0,
            voltage_max_cell: 0,
            temperature_min_ddegc: 0,
            temperature_max_ddegc: 0,
            temperature_mean_ddegc: 0,
        }
    }

    /// Voltage spread between the highest and lowest cell, in mV
    ///
    /// Balancing decisions key off this figure.
    pub const fn spread_mv(&self) -> u16 {
        self.voltage_max_mv.saturating_sub(self.voltage_min_mv)
    }
}

impl BlockData for MinMax {
    const ID: BlockId = id::MIN_MAX;
    const SIZE: usize = 3 * 2 + 2 + 3 * 2;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_u16(out, self.voltage_min_mv);
        codec::put_u16(out, self.voltage_max_mv);
        codec::put_u16(out, self.voltage_mean_mv);
        codec::put_u8(out, self.voltage_min_cell);
        codec::put_u8(out, self.voltage_max_cell);
        codec::put_i16(out, self.temperature_min_ddegc);
        codec::put_i16(out, self.temperature_max_ddegc);
        codec::put_i16(out, self.temperature_mean_ddegc);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            voltage_min_mv: codec::get_u16(bytes, 0),
            voltage_max_mv: codec::get_u16(bytes, 2),
            voltage_mean_mv: codec::get_u16(bytes, 4),
            voltage_min_cell: codec::get_u8(bytes, 6),
            voltage_max_cell: codec::get_u8(bytes, 7),
            temperature_min_ddegc: codec::get_i16(bytes, 8),
            temperature_max_ddegc: codec::get_i16(bytes, 10),
            temperature_mean_ddegc: codec::get_i16(bytes, 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_voltages_pack_and_unpack() {
        let mut block = CellVoltages::new();
        for (index, mv) in block.voltage_mv.iter_mut().enumerate() {
            *mv = 3_600 + index as u16;
        }
        block.flag_cell(1, 11);

        let mut bytes = BlockBytes::new();
        block.encode(&mut bytes);
        assert_eq!(bytes.len(), CellVoltages::SIZE);

        let back = CellVoltages::decode(&bytes);
        assert_eq!(back, block);
        assert!(back.cell_ok(0, 11));
        assert!(!back.cell_ok(1, 11));
    }

    #[test]
    fn pack_voltage_sums_all_cells() {
        let mut block = CellVoltages::new();
        for mv in block.voltage_mv.iter_mut() {
            *mv = 3_700;
        }
        assert_eq!(block.pack_voltage_mv(), 3_700 * 24);
    }

    #[test]
    fn temperature_fault_masks_are_per_module() {
        let mut block = CellTemperatures::new();
        block.flag_sensor(0, 3);
        assert!(!block.sensor_ok(0, 3));
        assert!(block.sensor_ok(1, 3));
    }

    #[test]
    fn current_sign_convention_marks_charging() {
        let mut block = PackCurrent::new();
        block.current_ma = -4_000;
        assert!(block.is_charging());
        block.current_ma = 12_000;
        assert!(!block.is_charging());
    }

    #[test]
    fn voltage_spread_saturates() {
        let block = MinMax {
            voltage_min_mv: 3_650,
            voltage_max_mv: 3_710,
            ..MinMax::new()
        };
        assert_eq!(block.spread_mv(), 60);
        assert_eq!(MinMax::new().spread_mv(), 0);
    }
}
