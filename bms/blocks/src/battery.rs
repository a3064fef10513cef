//! Battery pack layout and safety limits
//!
//! One place for the pack geometry every block layout derives from, plus
//! the current limits the monitoring tasks compare measurements against.
//! Limit tiers follow the usual three-stage scheme: maximum operating
//! limit (MOL) warns first, recommended safety limit (RSL) demands action,
//! maximum safety limit (MSL) opens the contactors.

/// Number of battery modules in series
pub const NR_OF_MODULES: usize = 2;

/// Number of cells per module
pub const NR_OF_CELLS_PER_MODULE: usize = 12;

/// Number of temperature sensors per module
pub const NR_OF_TEMP_SENSORS_PER_MODULE: usize = 8;

/// Total number of cells in the pack
pub const NR_OF_CELLS: usize = NR_OF_MODULES * NR_OF_CELLS_PER_MODULE;

/// Total number of temperature sensors in the pack
pub const NR_OF_TEMP_SENSORS: usize = NR_OF_MODULES * NR_OF_TEMP_SENSORS_PER_MODULE;

/// Discharge current maximum safety limit, in mA
pub const CURRENT_MAX_DISCHARGE_MSL_MA: u32 = 180_000;

/// Discharge current recommended safety limit, in mA
pub const CURRENT_MAX_DISCHARGE_RSL_MA: u32 = 170_000;

/// Discharge current maximum operating limit, in mA
pub const CURRENT_MAX_DISCHARGE_MOL_MA: u32 = 160_000;

/// Charge current maximum safety limit, in mA
pub const CURRENT_MAX_CHARGE_MSL_MA: u32 = 90_000;

/// Charge current recommended safety limit, in mA
pub const CURRENT_MAX_CHARGE_RSL_MA: u32 = 85_000;

/// Charge current maximum operating limit, in mA
pub const CURRENT_MAX_CHARGE_MOL_MA: u32 = 80_000;

/// Check a discharge current against the maximum safety limit
///
/// Discharge is positive by convention; charge currents never trip this.
pub const fn discharge_current_violates_msl(current_ma: i32) -> bool {
    current_ma > CURRENT_MAX_DISCHARGE_MSL_MA as i32
}

/// Check a charge current against the maximum safety limit
pub const fn charge_current_violates_msl(current_ma: i32) -> bool {
    current_ma < -(CURRENT_MAX_CHARGE_MSL_MA as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_totals_follow_module_layout() {
        assert_eq!(NR_OF_CELLS, 24);
        assert_eq!(NR_OF_TEMP_SENSORS, 16);
    }

    #[test]
    fn limit_tiers_are_ordered() {
        assert!(CURRENT_MAX_DISCHARGE_MOL_MA < CURRENT_MAX_DISCHARGE_RSL_MA);
        assert!(CURRENT_MAX_DISCHARGE_RSL_MA < CURRENT_MAX_DISCHARGE_MSL_MA);
        assert!(CURRENT_MAX_CHARGE_MOL_MA < CURRENT_MAX_CHARGE_RSL_MA);
        assert!(CURRENT_MAX_CHARGE_RSL_MA < CURRENT_MAX_CHARGE_MSL_MA);
    }

    #[test]
    fn current_checks_respect_sign_convention() {
        assert!(discharge_current_violates_msl(180_001));
        assert!(!discharge_current_violates_msl(180_000));
        assert!(!discharge_current_violates_msl(-200_000));

        assert!(charge_current_violates_msl(-90_001));
        assert!(!charge_current_violates_msl(-90_000));
        assert!(!charge_current_violates_msl(180_001));
    }
}
