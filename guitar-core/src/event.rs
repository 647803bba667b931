//! Snapshot-ready notification.

use guitar_proto::GuitarState;

/// One decoded record as delivered to listeners.
///
/// `flushed` is set when decoding this record made the connection discard
/// the transport's unread input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnapshotEvent {
    pub state: GuitarState,
    pub flushed: bool,
}

impl SnapshotEvent {
    #[must_use]
    pub const fn new(state: GuitarState, flushed: bool) -> Self {
        Self { state, flushed }
    }

    /// Event carrying [`GuitarState::neutral`], sent to sinks when the
    /// input goes away so no control stays held.
    #[must_use]
    pub const fn neutral() -> Self {
        Self::new(GuitarState::neutral(), false)
    }
}
