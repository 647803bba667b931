//! Platform-agnostic pieces of the guitar connector.
//!
//! This crate sits between the wire protocol ([`guitar_proto`]) and whatever
//! owns the serial port. It has no I/O of its own, so it can be used both
//! in embedded `no_std` environments and on a host.
//!
//! # Overview
//!
//! - [`event`]: the snapshot-ready notification ([`SnapshotEvent`])
//! - [`latency`]: drift tracking that decides when to flush stale input
//!   ([`LatencyMonitor`])
//! - [`input`]: input source trait ([`InputSource`])
//! - [`output`]: output sink trait ([`OutputSink`])
//! - [`bridge`]: orchestrates input-to-output flow ([`GuitarBridge`])
//!
//! # Example
//!
//! ```rust
//! use guitar_core::{LatencyMonitor, Verdict};
//!
//! let mut monitor = LatencyMonitor::new();
//! assert_eq!(monitor.observe(1_000, 500), Verdict::Baseline);
//!
//! // Next record decoded 10 ms after it was produced: reader is current.
//! assert!(monitor.observe(21_000, 10_500).flush());
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host builds)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod bridge;
pub mod event;
pub mod input;
pub mod latency;
pub mod output;

// Re-export main types at crate root
pub use bridge::{BridgeError, GuitarBridge};
pub use event::SnapshotEvent;
pub use input::{InputError, InputSource};
pub use latency::{LatencyMonitor, Verdict, FLUSH_THRESHOLD_MICROS};
pub use output::{OutputError, OutputSink};

pub use guitar_proto::{AnalogInput, DigitalInput, GuitarState};
