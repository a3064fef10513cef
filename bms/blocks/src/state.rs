//! System state, state requests, and error flag blocks

use core::fmt;

use bms_core::{codec, BlockBytes, BlockData, BlockId};

use crate::table::id;

/// State-of-charge estimate, in centi-percent (10000 = 100.00 %)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateOfCharge {
    /// Mean state of charge over all cells
    pub mean_cpct: u16,
    /// State of charge of the emptiest cell
    pub min_cpct: u16,
    /// State of charge of the fullest cell
    pub max_cpct: u16,
}

impl StateOfCharge {
    /// New zeroed block
    pub const fn new() -> Self {
        Self {
            mean_cpct: 0,
            min_cpct: 0,
            max_cpct: 0,
        }
    }

    /// Check that min, mean, and max are ordered
    pub const fn is_consistent(&self) -> bool {
        self.min_cpct <= self.mean_cpct && self.mean_cpct <= self.max_cpct
    }
}

impl BlockData for StateOfCharge {
    const ID: BlockId = id::STATE_OF_CHARGE;
    const SIZE: usize = 3 * 2;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_u16(out, self.mean_cpct);
        codec::put_u16(out, self.min_cpct);
        codec::put_u16(out, self.max_cpct);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            mean_cpct: codec::get_u16(bytes, 0),
            min_cpct: codec::get_u16(bytes, 2),
            max_cpct: codec::get_u16(bytes, 4),
        }
    }
}

/// Operating mode a task may request from the system state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestCode {
    /// Contactors open, electronics alive
    Standby = 0,
    /// Normal discharge operation
    Normal = 1,
    /// Charge operation
    Charge = 2,
    /// Enter the error state
    Error = 3,
}

impl RequestCode {
    /// Decode a raw request byte
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Standby),
            1 => Some(Self::Normal),
            2 => Some(Self::Charge),
            3 => Some(Self::Error),
            _ => None,
        }
    }

    /// Raw request byte
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standby => write!(f, "standby"),
            Self::Normal => write!(f, "normal"),
            Self::Charge => write!(f, "charge"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RequestCode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Standby => defmt::write!(fmt, "standby"),
            Self::Normal => defmt::write!(fmt, "normal"),
            Self::Charge => defmt::write!(fmt, "charge"),
            Self::Error => defmt::write!(fmt, "error"),
        }
    }
}

/// Mode request handed from application tasks to the state machine
///
/// Raw bytes on the wire so an unknown code still travels through the
/// store; consumers decode with [`RequestCode::from_raw`] and treat
/// `None` as a request to enter the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateRequest {
    /// Pending request code
    pub request: u8,
    /// Code of the previously accepted request
    pub previous_request: u8,
}

impl StateRequest {
    /// New block with both codes at standby
    pub const fn new() -> Self {
        Self {
            request: 0,
            previous_request: 0,
        }
    }

    /// Typed view of the pending request
    pub const fn request_code(&self) -> Option<RequestCode> {
        RequestCode::from_raw(self.request)
    }
}

impl BlockData for StateRequest {
    const ID: BlockId = id::STATE_REQUEST;
    const SIZE: usize = 2;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_u8(out, self.request);
        codec::put_u8(out, self.previous_request);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            request: codec::get_u8(bytes, 0),
            previous_request: codec::get_u8(bytes, 1),
        }
    }
}

/// Mode of the system state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemMode {
    /// Power-on state before init completes
    Uninitialized = 0,
    /// Contactors open, ready for requests
    Standby = 1,
    /// Precharge sequence running
    Precharge = 2,
    /// Discharge operation
    Normal = 3,
    /// Charge operation
    Charge = 4,
    /// Latched error state
    Error = 5,
}

impl SystemMode {
    /// Decode a raw mode byte
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::Standby),
            2 => Some(Self::Precharge),
            3 => Some(Self::Normal),
            4 => Some(Self::Charge),
            5 => Some(Self::Error),
            _ => None,
        }
    }

    /// Raw mode byte
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Standby => write!(f, "standby"),
            Self::Precharge => write!(f, "precharge"),
            Self::Normal => write!(f, "normal"),
            Self::Charge => write!(f, "charge"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SystemMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Uninitialized => defmt::write!(fmt, "uninitialized"),
            Self::Standby => defmt::write!(fmt, "standby"),
            Self::Precharge => defmt::write!(fmt, "precharge"),
            Self::Normal => defmt::write!(fmt, "normal"),
            Self::Charge => defmt::write!(fmt, "charge"),
            Self::Error => defmt::write!(fmt, "error"),
        }
    }
}

/// Current mode of the system state machine, published for all tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    /// Raw mode byte, see [`SystemMode`]
    pub mode: u8,
    /// Nonzero while an emergency shutdown is in progress
    pub emergency: u8,
}

impl SystemState {
    /// New block in the uninitialized mode
    pub const fn new() -> Self {
        Self {
            mode: 0,
            emergency: 0,
        }
    }

    /// Typed view of the mode byte
    pub const fn mode(&self) -> Option<SystemMode> {
        SystemMode::from_raw(self.mode)
    }

    /// Set the mode byte from a typed mode
    pub fn set_mode(&mut self, mode: SystemMode) {
        self.mode = mode.raw();
    }

    /// Check whether an emergency shutdown is in progress
    pub const fn emergency_active(&self) -> bool {
        self.emergency != 0
    }
}

impl BlockData for SystemState {
    const ID: BlockId = id::SYSTEM_STATE;
    const SIZE: usize = 2;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_u8(out, self.mode);
        codec::put_u8(out, self.emergency);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            mode: codec::get_u8(bytes, 0),
            emergency: codec::get_u8(bytes, 1),
        }
    }
}

/// Latched error conditions, one bit per monitored fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorFlags {
    /// Active fault bits
    pub flags: u32,
}

impl ErrorFlags {
    /// A cell exceeded the overvoltage safety limit
    pub const OVERVOLTAGE: u32 = 1 << 0;
    /// A cell fell below the undervoltage safety limit
    pub const UNDERVOLTAGE: u32 = 1 << 1;
    /// Overtemperature while charging
    pub const OVERTEMP_CHARGE: u32 = 1 << 2;
    /// Overtemperature while discharging
    pub const OVERTEMP_DISCHARGE: u32 = 1 << 3;
    /// Undertemperature while charging
    pub const UNDERTEMP_CHARGE: u32 = 1 << 4;
    /// Undertemperature while discharging
    pub const UNDERTEMP_DISCHARGE: u32 = 1 << 5;
    /// Charge current above the safety limit
    pub const OVERCURRENT_CHARGE: u32 = 1 << 6;
    /// Discharge current above the safety limit
    pub const OVERCURRENT_DISCHARGE: u32 = 1 << 7;
    /// Current sensor stopped responding
    pub const CURRENT_SENSOR_LOST: u32 = 1 << 8;
    /// Interlock line is open
    pub const INTERLOCK_OPEN: u32 = 1 << 9;

    /// New block with no faults latched
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Latch a fault bit
    pub fn set(&mut self, flag: u32) {
        self.flags |= flag;
    }

    /// Clear a fault bit
    pub fn clear(&mut self, flag: u32) {
        self.flags &= !flag;
    }

    /// Check a single fault bit
    pub const fn is_set(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Check whether any fault is latched
    pub const fn any(&self) -> bool {
        self.flags != 0
    }
}

impl BlockData for ErrorFlags {
    const ID: BlockId = id::ERROR_FLAGS;
    const SIZE: usize = 4;

    fn encode(&self, out: &mut BlockBytes) {
        codec::put_u32(out, self.flags);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            flags: codec::get_u32(bytes, 0),
        }
    }
}
