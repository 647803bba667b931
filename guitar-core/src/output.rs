//! Output sink trait and error types.

use core::future::Future;

use crate::event::SnapshotEvent;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Communication I/O error.
    Io,
    /// Device not ready (e.g., joystick driver not acquired).
    NotReady,
}

/// Async trait for snapshot listeners (terminal display, joystick feeder).
///
/// # Backpressure
///
/// Sinks run on the same task that drains the transport. Time spent in
/// [`send`](OutputSink::send) is time the serial bytes pile up unread; a
/// slow sink therefore delays framing and the latency monitor ends up
/// flushing the backlog. Keep `send` short, or throttle inside the sink.
pub trait OutputSink {
    /// Deliver one snapshot event.
    fn send(&mut self, event: &SnapshotEvent) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the output is ready to accept data.
    fn is_ready(&self) -> bool;
}

/// Two listeners sharing every event. Both always receive the event; the
/// first error is reported.
impl<A: OutputSink, B: OutputSink> OutputSink for (A, B) {
    async fn send(&mut self, event: &SnapshotEvent) -> Result<(), OutputError> {
        let first = self.0.send(event).await;
        let second = self.1.send(event).await;
        first.and(second)
    }

    fn is_ready(&self) -> bool {
        self.0.is_ready() && self.1.is_ready()
    }
}
