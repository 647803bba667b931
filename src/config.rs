//! Runtime configuration for the connector.
//!
//! Protocol constants (record layout, magic, baud rate) live in
//! [`guitar_proto`]; everything here is a knob with a sensible default.

use embassy_time::Duration;
use guitar_core::FLUSH_THRESHOLD_MICROS;
use guitar_proto::{LeftoverPolicy, BAUD_RATE};

/// Overall time a probed port has to produce a live snapshot.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Time a port has to open.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Sleep between transport polls when no record is ready.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Serial line settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Assert DTR after opening. The guitar only streams with DTR and RTS set.
    pub dtr: bool,
    pub rts: bool,
    /// Blocking read timeout of the OS handle.
    pub read_timeout: std::time::Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: BAUD_RATE,
            dtr: true,
            rts: true,
            read_timeout: std::time::Duration::from_millis(10),
        }
    }
}

/// Per-connection stream processing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub poll_interval: Duration,
    /// Drift below which the transport's unread input is discarded.
    pub flush_threshold: Duration,
    pub leftover: LeftoverPolicy,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            flush_threshold: Duration::from_micros(FLUSH_THRESHOLD_MICROS),
            leftover: LeftoverPolicy::Discard,
        }
    }
}

/// Discovery race settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Live-proof budget per port, counted from a successful open.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Port names never probed.
    pub ignore: Vec<String>,
    pub connection: ConnectionConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout: DISCOVERY_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            ignore: Vec::new(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Upper bound on how long a discovery run can take, excluding
    /// scheduling overhead.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.connect_timeout + self.timeout
    }

    #[must_use]
    pub fn is_ignored(&self, port: &str) -> bool {
        self.ignore.iter().any(|p| p == port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let serial = SerialConfig::default();
        assert_eq!(serial.baud_rate, 1_000_000);
        assert!(serial.dtr && serial.rts);

        let discovery = DiscoveryConfig::default();
        assert_eq!(discovery.deadline(), Duration::from_millis(2500));
        assert_eq!(
            discovery.connection.flush_threshold,
            Duration::from_millis(100)
        );
        assert_eq!(discovery.connection.leftover, LeftoverPolicy::Discard);
    }

    #[test]
    fn test_ignore_list() {
        let config = DiscoveryConfig {
            ignore: vec!["COM1".to_string()],
            ..DiscoveryConfig::default()
        };
        assert!(config.is_ignored("COM1"));
        assert!(!config.is_ignored("COM3"));
    }
}
