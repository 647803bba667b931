//! Latency monitor: detects when the reader has caught up with the device.
//!
//! The first record of a connection fixes a baseline, the host instant at
//! which the device's uptime counter would have read zero. For every later
//! record the expected arrival time is `baseline + uptime`; the difference
//! between that and the actual host time is the drift.
//!
//! While a backlog of stale bytes is being worked through, records arrive
//! faster than real time and the drift grows. Once drift falls below the
//! threshold the reader is current again, and whatever is still queued on
//! the transport is older than the record just decoded, so the connection
//! discards it.
//!
//! Times are microseconds on a monotonic host clock; the epoch is
//! irrelevant as long as it does not change during a connection.

/// Default drift threshold: 100 ms.
pub const FLUSH_THRESHOLD_MICROS: u64 = 100_000;

/// Outcome of observing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// First record of the connection; the baseline was just set.
    Baseline,
    /// Drift is below the threshold. The transport should be flushed.
    CaughtUp { drift_micros: i64 },
    /// Drift is at or above the threshold.
    Lagging { drift_micros: i64 },
}

impl Verdict {
    /// Whether the transport's unread input should be discarded.
    #[inline]
    #[must_use]
    pub const fn flush(self) -> bool {
        matches!(self, Self::CaughtUp { .. })
    }

    #[must_use]
    pub const fn drift_micros(self) -> Option<i64> {
        match self {
            Self::Baseline => None,
            Self::CaughtUp { drift_micros } | Self::Lagging { drift_micros } => Some(drift_micros),
        }
    }
}

/// Per-connection drift tracker.
///
/// The baseline is never reset; a new connection gets a new monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyMonitor {
    baseline: Option<i128>,
    threshold_micros: u64,
}

impl LatencyMonitor {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(FLUSH_THRESHOLD_MICROS)
    }

    #[must_use]
    pub const fn with_threshold(threshold_micros: u64) -> Self {
        Self {
            baseline: None,
            threshold_micros,
        }
    }

    #[inline]
    #[must_use]
    pub const fn threshold_micros(&self) -> u64 {
        self.threshold_micros
    }

    /// Whether a baseline has been taken.
    #[inline]
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Observe a record with device `uptime` decoded at host time `now_micros`.
    pub fn observe(&mut self, now_micros: u64, uptime: u64) -> Verdict {
        let now = i128::from(now_micros);
        let uptime = i128::from(uptime);

        let Some(baseline) = self.baseline else {
            self.baseline = Some(now - uptime);
            return Verdict::Baseline;
        };

        let drift = now - (baseline + uptime);
        let drift_micros = drift.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

        if drift < i128::from(self.threshold_micros) {
            Verdict::CaughtUp { drift_micros }
        } else {
            Verdict::Lagging { drift_micros }
        }
    }
}

impl Default for LatencyMonitor {
    fn default() -> Self {
        Self::new()
    }
}
