//! Wire record codec.
//!
//! # Record Layout
//!
//! All multi-byte fields are little-endian.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 4    | magic `0xABC0FFEE` (`EE FF C0 AB` on the wire) |
//! | 4      | 8    | uptime, microseconds since device boot (u64) |
//! | 12     | 13   | digital flags, one byte each, non-zero = active |
//! | 25     | 8    | analog values, one f32 each |
//!
//! The layout, the magic value and the control counts form one contract:
//! changing any of them changes [`SERIALIZED_SIZE`] and breaks every device
//! running older firmware.

use crate::types::{GuitarState, ANALOG_COUNT, DIGITAL_COUNT};

/// Start-of-record marker.
pub const MAGIC: u32 = 0xABC0_FFEE;

/// Size of the magic marker on the wire.
pub const MAGIC_SIZE: usize = core::mem::size_of::<u32>();

const UPTIME_SIZE: usize = core::mem::size_of::<u64>();
const ANALOG_SIZE: usize = core::mem::size_of::<f32>();

const UPTIME_OFFSET: usize = MAGIC_SIZE;
const DIGITAL_OFFSET: usize = UPTIME_OFFSET + UPTIME_SIZE;
const ANALOG_OFFSET: usize = DIGITAL_OFFSET + DIGITAL_COUNT;

/// Size of one wire record.
pub const SERIALIZED_SIZE: usize = ANALOG_OFFSET + ANALOG_SIZE * ANALOG_COUNT;

/// Record decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Fewer than [`SERIALIZED_SIZE`] bytes were supplied.
    InsufficientBytes,
    /// The first four bytes are not [`MAGIC`].
    InvalidMagic,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientBytes => write!(f, "not enough bytes for a record"),
            Self::InvalidMagic => write!(f, "invalid record magic"),
        }
    }
}

/// Whether `bytes` starts with the magic marker.
#[inline]
#[must_use]
pub fn starts_with_magic(bytes: &[u8]) -> bool {
    bytes.len() >= MAGIC_SIZE && read_u32(bytes, 0) == MAGIC
}

/// Decode one record from the start of `bytes`.
///
/// Bytes past [`SERIALIZED_SIZE`] are ignored.
///
/// # Errors
///
/// - [`DecodeError::InsufficientBytes`] if `bytes` is shorter than one record.
/// - [`DecodeError::InvalidMagic`] if it does not start with [`MAGIC`].
pub fn decode(bytes: &[u8]) -> Result<GuitarState, DecodeError> {
    if bytes.len() < SERIALIZED_SIZE {
        return Err(DecodeError::InsufficientBytes);
    }
    if !starts_with_magic(bytes) {
        return Err(DecodeError::InvalidMagic);
    }

    let mut state = GuitarState::neutral();
    state.uptime = read_u64(bytes, UPTIME_OFFSET);

    for (i, flag) in state.digital.iter_mut().enumerate() {
        *flag = bytes[DIGITAL_OFFSET + i] != 0;
    }

    for (i, value) in state.analog.iter_mut().enumerate() {
        *value = f32::from_bits(read_u32(bytes, ANALOG_OFFSET + i * ANALOG_SIZE));
    }

    Ok(state)
}

/// Encode `state` as one wire record.
///
/// Active flags are written as `1`. `encode(&decode(bytes)?)` therefore
/// reproduces `bytes` only when every flag byte is `0` or `1`; any other
/// non-zero flag byte comes back as `1`.
#[must_use]
pub fn encode(state: &GuitarState) -> [u8; SERIALIZED_SIZE] {
    let mut buf = [0u8; SERIALIZED_SIZE];

    buf[..MAGIC_SIZE].copy_from_slice(&MAGIC.to_le_bytes());
    buf[UPTIME_OFFSET..DIGITAL_OFFSET].copy_from_slice(&state.uptime.to_le_bytes());

    for (i, &flag) in state.digital.iter().enumerate() {
        buf[DIGITAL_OFFSET + i] = u8::from(flag);
    }

    for (i, value) in state.analog.iter().enumerate() {
        let start = ANALOG_OFFSET + i * ANALOG_SIZE;
        buf[start..start + ANALOG_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    buf
}

#[inline]
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; UPTIME_SIZE];
    raw.copy_from_slice(&bytes[offset..offset + UPTIME_SIZE]);
    u64::from_le_bytes(raw)
}
