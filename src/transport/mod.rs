//! Transport layer for I/O abstraction

use crate::error::Result;

mod serial;
pub use serial::SerialTransport;

#[cfg(test)]
pub(crate) mod mock;

/// Byte-stream transport to the guitar.
///
/// A transport is owned by exactly one [`Connection`](crate::Connection);
/// dropping it closes the underlying handle.
pub trait Transport: Send {
    /// Endpoint name (e.g. `/dev/ttyACM0`, `COM3`)
    fn name(&self) -> &str;

    /// Number of received bytes waiting to be read
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read data into buffer, returns number of bytes read
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Drop every received byte that has not been read yet
    fn discard_input(&mut self) -> Result<()>;
}
