//! Stream framer: turns a chunked serial byte stream into records.
//!
//! The device streams records back to back with no length prefix or
//! checksum, so the only framing information is the magic marker at the
//! start of each record. The framer works chunk by chunk:
//!
//! - With nothing buffered, the chunk is scanned **backwards** for the
//!   most recent magic marker. Older records in the same chunk are skipped,
//!   so a burst collapses to the freshest state. A chunk with no marker is
//!   dropped; records repeat quickly enough that the next one will do.
//! - If the most recent record is cut off by the end of the chunk, its
//!   bytes go into a bounded resync buffer.
//! - The next chunk first tops the resync buffer up to one record. What
//!   happens to the remaining bytes of that chunk is decided by
//!   [`LeftoverPolicy`].
//!
//! The framer never reads on its own. Callers that own a transport should
//! check [`StreamFramer::wants`] before reading, so that a handful of
//! freshly arrived bytes is left on the transport until a whole record is
//! there instead of triggering a resync scan.

use heapless::Vec;

use crate::codec::{decode, starts_with_magic, DecodeError, MAGIC_SIZE, SERIALIZED_SIZE};
use crate::types::GuitarState;

/// What to do with the rest of a chunk after it completed a buffered record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeftoverPolicy {
    /// Drop the remaining bytes. The next chunk starts a fresh scan.
    #[default]
    Discard,
    /// Scan the remaining bytes as if they were a new chunk.
    Refeed,
}

/// Running counters, for diagnostics only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramerStats {
    /// Records decoded and emitted.
    pub decoded: u32,
    /// Chunks that contained no magic marker.
    pub dropped_chunks: u32,
    /// Partial records moved into the resync buffer.
    pub carried: u32,
    /// Bytes thrown away by [`LeftoverPolicy::Discard`].
    pub discarded_bytes: u32,
}

/// Record framer for one connection.
///
/// Owns its resync buffer; never share one framer between transports.
#[derive(Debug, Default)]
pub struct StreamFramer {
    resync: Vec<u8, SERIALIZED_SIZE>,
    policy: LeftoverPolicy,
    stats: FramerStats,
}

impl StreamFramer {
    /// Create a framer using [`LeftoverPolicy::Discard`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(LeftoverPolicy::Discard)
    }

    #[must_use]
    pub fn with_policy(policy: LeftoverPolicy) -> Self {
        Self {
            resync: Vec::new(),
            policy,
            stats: FramerStats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> LeftoverPolicy {
        self.policy
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Number of bytes held in the resync buffer.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.resync.len()
    }

    /// Bytes still required to make up one record together with the
    /// resync buffer.
    #[inline]
    #[must_use]
    pub fn bytes_needed(&self) -> usize {
        SERIALIZED_SIZE - self.resync.len()
    }

    /// Read guard: whether `available` unread bytes on the transport are
    /// worth reading now.
    #[inline]
    #[must_use]
    pub fn wants(&self, available: usize) -> bool {
        available >= self.bytes_needed()
    }

    /// Forget any partially received record.
    pub fn reset(&mut self) {
        self.resync.clear();
    }

    /// Feed one chunk of raw bytes, calling `emit` for every decoded record.
    pub fn push<F: FnMut(GuitarState)>(&mut self, chunk: &[u8], mut emit: F) {
        if self.resync.is_empty() {
            self.scan(chunk, &mut emit);
            return;
        }

        let take = self.bytes_needed().min(chunk.len());
        let (head, rest) = chunk.split_at(take);
        // `take` never exceeds the free capacity
        let _ = self.resync.extend_from_slice(head);
        if self.resync.len() < SERIALIZED_SIZE {
            return;
        }

        let result = decode(&self.resync);
        self.resync.clear();
        self.emit_decoded(result, &mut emit);

        match self.policy {
            LeftoverPolicy::Discard => {
                self.stats.discarded_bytes = self
                    .stats
                    .discarded_bytes
                    .saturating_add(rest.len() as u32);
            }
            LeftoverPolicy::Refeed => {
                if !rest.is_empty() {
                    self.scan(rest, &mut emit);
                }
            }
        }
    }

    /// Resync scan of a chunk with an empty resync buffer.
    fn scan<F: FnMut(GuitarState)>(&mut self, chunk: &[u8], emit: &mut F) {
        let Some(start) = find_last_magic(chunk) else {
            self.stats.dropped_chunks = self.stats.dropped_chunks.saturating_add(1);
            return;
        };

        let record = &chunk[start..];
        if record.len() < SERIALIZED_SIZE {
            let _ = self.resync.extend_from_slice(record);
            self.stats.carried = self.stats.carried.saturating_add(1);
            return;
        }

        self.emit_decoded(decode(record), emit);
    }

    fn emit_decoded<F: FnMut(GuitarState)>(
        &mut self,
        result: Result<GuitarState, DecodeError>,
        emit: &mut F,
    ) {
        // The buffer always starts at a marker and holds a full record here,
        // so decoding cannot fail; a failure is treated like a dropped chunk.
        match result {
            Ok(state) => {
                self.stats.decoded = self.stats.decoded.saturating_add(1);
                emit(state);
            }
            Err(_) => {
                self.stats.dropped_chunks = self.stats.dropped_chunks.saturating_add(1);
            }
        }
    }
}

/// Position of the most recent magic marker in `chunk`.
///
/// The scan starts at `len - 1 - MAGIC_SIZE`, so a marker that occupies
/// exactly the last four bytes is not considered.
#[must_use]
pub fn find_last_magic(chunk: &[u8]) -> Option<usize> {
    let last = chunk.len().checked_sub(1 + MAGIC_SIZE)?;
    (0..=last).rev().find(|&i| starts_with_magic(&chunk[i..]))
}
