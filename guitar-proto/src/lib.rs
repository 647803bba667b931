//! Wire protocol of the PSGTS2 guitar controller.
//!
//! The guitar streams fixed-size binary state records over a serial link.
//! This crate knows the record layout and how to recover records from a
//! byte stream that may be fragmented or out of sync:
//!
//! - **Types**: [`GuitarState`], [`DigitalInput`], [`AnalogInput`]
//! - **Codec**: [`decode()`] / [`encode()`] a single record
//! - **Framing**: [`StreamFramer`] locates records in arbitrary chunks
//!
//! # Record Format
//!
//! ```text
//! EE FF C0 AB | uptime: u64 LE | 13 x flag: u8 | 2 x value: f32 LE
//! ```
//!
//! See [`codec`] for offsets.
//!
//! # Example
//!
//! ```
//! use guitar_proto::{encode, DigitalInput, GuitarState, StreamFramer};
//!
//! let mut state = GuitarState::neutral();
//! state.uptime = 1_000_000;
//! state.set_digital(DigitalInput::Green, true);
//!
//! let mut framer = StreamFramer::new();
//! let mut latest = None;
//! framer.push(&encode(&state), |s| latest = Some(s));
//!
//! assert_eq!(latest, Some(state));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod framer;
pub mod types;

pub use codec::{decode, encode, DecodeError, MAGIC, MAGIC_SIZE, SERIALIZED_SIZE};
pub use framer::{find_last_magic, FramerStats, LeftoverPolicy, StreamFramer};
pub use types::{AnalogInput, DigitalInput, GuitarState, ANALOG_COUNT, DIGITAL_COUNT};

/// Serial line rate used by the guitar firmware.
pub const BAUD_RATE: u32 = 1_000_000;
