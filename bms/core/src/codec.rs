//! Little-endian field packing for block payloads
//!
//! Blocks travel through the store as plain bytes. These helpers keep the
//! field layout explicit and independent of host struct layout; every
//! multi-byte field is little-endian. Writers that would overflow the
//! bounded buffer drop the excess, readers past the end yield zero, so a
//! malformed length surfaces as a size mismatch in the store rather than
//! a panic here.

use crate::block::BlockBytes;

/// Append a u8 field
pub fn put_u8(out: &mut BlockBytes, value: u8) {
    let _ = out.push(value);
}

/// Append a u16 field, little-endian
pub fn put_u16(out: &mut BlockBytes, value: u16) {
    let _ = out.extend_from_slice(&value.to_le_bytes());
}

/// Append a u32 field, little-endian
pub fn put_u32(out: &mut BlockBytes, value: u32) {
    let _ = out.extend_from_slice(&value.to_le_bytes());
}

/// Append an i16 field, little-endian
pub fn put_i16(out: &mut BlockBytes, value: i16) {
    let _ = out.extend_from_slice(&value.to_le_bytes());
}

/// Append an i32 field, little-endian
pub fn put_i32(out: &mut BlockBytes, value: i32) {
    let _ = out.extend_from_slice(&value.to_le_bytes());
}

/// Read a u8 field at `at`
pub fn get_u8(bytes: &[u8], at: usize) -> u8 {
    bytes.get(at).copied().unwrap_or(0)
}

/// Read a little-endian u16 field at `at`
pub fn get_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([get_u8(bytes, at), get_u8(bytes, at + 1)])
}

/// Read a little-endian u32 field at `at`
pub fn get_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([
        get_u8(bytes, at),
        get_u8(bytes, at + 1),
        get_u8(bytes, at + 2),
        get_u8(bytes, at + 3),
    ])
}

/// Read a little-endian i16 field at `at`
pub fn get_i16(bytes: &[u8], at: usize) -> i16 {
    get_u16(bytes, at) as i16
}

/// Read a little-endian i32 field at `at`
pub fn get_i32(bytes: &[u8], at: usize) -> i32 {
    get_u32(bytes, at) as i32
}
