//! Host-side connector for the PSGTS2 guitar controller.
//!
//! The guitar streams fixed-size state records over a USB serial port at
//! 1 Mbaud. This crate finds the port the guitar is on, frames and decodes
//! the stream and keeps the reader close to real time by discarding
//! backlog once it has caught up.
//!
//! # Architecture
//!
//! ```text
//! Discovery ──► Connection<T: Transport> ──► GuitarBridge ──► OutputSink(s)
//!                 │  StreamFramer (guitar-proto)
//!                 └─ LatencyMonitor (guitar-core)
//! ```
//!
//! - [`transport`]: byte-stream abstraction over the serial port
//! - [`connection`]: per-port framing, decoding and flushing
//! - [`discovery`]: parallel probe of every candidate port
//! - [`display`]: terminal view, an [`OutputSink`](guitar_core::OutputSink)

pub mod config;
pub mod connection;
pub mod discovery;
pub mod display;
pub mod error;
pub mod transport;

pub use config::{ConnectionConfig, DiscoveryConfig, SerialConfig};
pub use connection::Connection;
pub use discovery::{discover, Discovery, PortOpener, SerialOpener};
pub use display::TerminalDisplay;
pub use error::{Error, Result};
pub use transport::{SerialTransport, Transport};

pub use guitar_core::{GuitarBridge, OutputSink, SnapshotEvent};
pub use guitar_proto::GuitarState;
