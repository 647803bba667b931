//! Error types for the guitar connector

use guitar_core::InputError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Connector error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error (open, configure, status queries)
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error while reading the stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port did not open within the connect timeout
    #[error("Timed out opening {port} after {timeout_ms} ms")]
    OpenTimeout {
        /// Port name
        port: String,
        /// Connect timeout that expired
        timeout_ms: u64,
    },

    /// Port opened but produced no live snapshot in time
    #[error("No snapshot from {port} within {timeout_ms} ms")]
    LiveTimeout {
        /// Port name
        port: String,
        /// Live-proof timeout that expired
        timeout_ms: u64,
    },

    /// Transport reported end of stream
    #[error("Port {0} disconnected")]
    Disconnected(String),

    /// No candidate port produced a live snapshot
    #[error("Guitar not found")]
    NotFound,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map to the platform-agnostic input error seen by bridges.
    #[must_use]
    pub fn to_input_error(&self) -> InputError {
        match self {
            Self::Disconnected(_)
            | Self::NotFound
            | Self::OpenTimeout { .. }
            | Self::LiveTimeout { .. } => InputError::Disconnected,
            _ => InputError::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_mapping() {
        let io = Error::Io(std::io::Error::other("broken pipe"));
        assert_eq!(io.to_input_error(), InputError::Io);
        assert_eq!(
            Error::Disconnected("COM3".to_string()).to_input_error(),
            InputError::Disconnected
        );
        let timeout = Error::LiveTimeout {
            port: "COM3".to_string(),
            timeout_ms: 1500,
        };
        assert_eq!(timeout.to_input_error(), InputError::Disconnected);
    }
}
