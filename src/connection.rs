//! Per-port stream processing.
//!
//! A [`Connection`] is created when a port opens and dropped when it
//! closes. It is the only owner of the transport, the framer's resync
//! buffer and the latency baseline, and everything happens through
//! `&mut self`, so there is exactly one writer for all three regardless of
//! how the executor schedules the task driving it.

use std::collections::VecDeque;

use embassy_time::{Instant, Timer};
use guitar_core::{InputError, InputSource, LatencyMonitor, SnapshotEvent, Verdict};
use guitar_proto::{FramerStats, GuitarState, StreamFramer};

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::transport::Transport;

/// Events decoded but not yet handed out. Reads produce at most two, so
/// this only trips if [`Connection::poll`] is called without consuming.
const MAX_PENDING: usize = 8;

/// A live byte stream from one port, decoded into snapshot events.
pub struct Connection<T: Transport> {
    transport: T,
    framer: StreamFramer,
    monitor: LatencyMonitor,
    /// Most recent decoded state.
    state: GuitarState,
    pending: VecDeque<SnapshotEvent>,
    /// Reusable read buffer.
    chunk: Vec<u8>,
    decoded: Vec<GuitarState>,
    config: ConnectionConfig,
    flushes: u32,
    connected: bool,
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T, config: &ConnectionConfig) -> Self {
        Self {
            transport,
            framer: StreamFramer::with_policy(config.leftover),
            monitor: LatencyMonitor::with_threshold(config.flush_threshold.as_micros()),
            state: GuitarState::neutral(),
            pending: VecDeque::with_capacity(MAX_PENDING),
            chunk: Vec::new(),
            decoded: Vec::with_capacity(2),
            config: *config,
            flushes: 0,
            connected: true,
        }
    }

    /// Name of the port this connection reads from.
    pub fn name(&self) -> &str {
        self.transport.name()
    }

    /// Most recent decoded state; neutral until the first record.
    pub fn current_state(&self) -> &GuitarState {
        &self.state
    }

    pub fn framer_stats(&self) -> FramerStats {
        self.framer.stats()
    }

    /// Number of times the transport input was discarded.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// Run one non-blocking processing step.
    ///
    /// Reads from the transport only when the bytes waiting there complete
    /// at least one record, frames them and queues the resulting events.
    /// Returns the number of events queued.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as-is and mark the connection as
    /// disconnected; the caller should drop it.
    pub fn poll(&mut self) -> Result<usize> {
        self.step().inspect_err(|e| {
            log::warn!("{}: stream failed: {}", self.transport.name(), e);
            self.connected = false;
        })
    }

    fn step(&mut self) -> Result<usize> {
        let available = self.transport.bytes_available()?;
        if !self.framer.wants(available) {
            return Ok(0);
        }

        self.chunk.resize(available, 0);
        let read = self.transport.read(&mut self.chunk)?;

        let decoded = &mut self.decoded;
        self.framer.push(&self.chunk[..read], |state| decoded.push(state));

        let mut queued = 0;
        for state in self.decoded.drain(..) {
            let verdict = self.monitor.observe(Instant::now().as_micros(), state.uptime);
            let flushed = verdict.flush();
            if flushed {
                self.transport.discard_input()?;
                // Whatever would have completed a buffered partial is gone.
                self.framer.reset();
                self.flushes = self.flushes.saturating_add(1);
            }
            if let Verdict::Lagging { drift_micros } = verdict {
                log::trace!("{}: behind by {} us", self.transport.name(), drift_micros);
            }

            self.state = state;
            if self.pending.len() == MAX_PENDING {
                self.pending.pop_front();
            }
            self.pending.push_back(SnapshotEvent::new(state, flushed));
            queued += 1;
        }

        Ok(queued)
    }

    /// Wait for the next snapshot event, sleeping between polls.
    pub async fn next_event(&mut self) -> Result<SnapshotEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            if self.poll()? == 0 {
                Timer::after(self.config.poll_interval).await;
            }
        }
    }

    /// Wait for the first event whose state carries a device uptime.
    pub async fn wait_live(&mut self) -> Result<SnapshotEvent> {
        loop {
            let event = self.next_event().await?;
            if event.state.is_live() {
                return Ok(event);
            }
        }
    }

    /// Close the port.
    pub fn close(self) {
        log::info!(
            "Closing {} ({} records, {} flushes)",
            self.transport.name(),
            self.framer.stats().decoded,
            self.flushes
        );
    }
}

impl<T: Transport> InputSource for Connection<T> {
    async fn receive(&mut self) -> core::result::Result<SnapshotEvent, InputError> {
        self.next_event().await.map_err(|e| e.to_input_error())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
