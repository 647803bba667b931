//! Input source trait and error types.

use core::future::Future;

use crate::event::SnapshotEvent;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Transport I/O error.
    Io,
    /// Connection lost.
    Disconnected,
}

/// Async trait for guitar snapshot sources.
///
/// Implementations own their transport and framing state exclusively;
/// `receive` is the only way records leave them, so a source is never
/// mutated from two places at once.
pub trait InputSource {
    /// Wait for and receive the next snapshot event.
    fn receive(&mut self) -> impl Future<Output = Result<SnapshotEvent, InputError>>;

    /// Check if the input source is connected/ready.
    fn is_connected(&self) -> bool;
}
