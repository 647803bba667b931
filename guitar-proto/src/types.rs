//! Guitar controls and the decoded state snapshot.

use core::time::Duration;

/// Number of digital controls carried by every record.
pub const DIGITAL_COUNT: usize = DigitalInput::ALL.len();

/// Number of analog controls carried by every record.
pub const ANALOG_COUNT: usize = AnalogInput::ALL.len();

/// Digital controls, in wire order.
///
/// The discriminant is the position of the flag inside a record, so the
/// order of the variants is part of the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DigitalInput {
    Down,
    Up,
    Green,
    Red,
    Yellow,
    Blue,
    Orange,
    Select,
    Start,
    Left,
    Right,
    Tilt,
    Home,
}

impl DigitalInput {
    /// Every digital control, in wire order.
    pub const ALL: [Self; 13] = [
        Self::Down,
        Self::Up,
        Self::Green,
        Self::Red,
        Self::Yellow,
        Self::Blue,
        Self::Orange,
        Self::Select,
        Self::Start,
        Self::Left,
        Self::Right,
        Self::Tilt,
        Self::Home,
    ];

    /// Position of this control's flag inside a record.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down => "Down",
            Self::Up => "Up",
            Self::Green => "Green",
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Orange => "Orange",
            Self::Select => "Select",
            Self::Start => "Start",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Tilt => "Tilt",
            Self::Home => "Home",
        }
    }
}

/// Analog controls, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnalogInput {
    Whammy,
    PickupSelector,
}

impl AnalogInput {
    /// Every analog control, in wire order.
    pub const ALL: [Self; 2] = [Self::Whammy, Self::PickupSelector];

    /// Position of this control's value inside a record.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Whammy => "Whammy",
            Self::PickupSelector => "PickupSelector",
        }
    }
}

/// One decoded guitar state record.
///
/// `uptime` is the device's microsecond counter since boot. A value of zero
/// means no record has been received yet.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GuitarState {
    pub uptime: u64,
    pub digital: [bool; DIGITAL_COUNT],
    pub analog: [f32; ANALOG_COUNT],
}

impl GuitarState {
    /// State before any record arrived: zero uptime, nothing pressed,
    /// analog controls at rest.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            uptime: 0,
            digital: [false; DIGITAL_COUNT],
            analog: [0.0; ANALOG_COUNT],
        }
    }

    /// Whether this state came from a device (non-default uptime).
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.uptime != 0
    }

    #[inline]
    #[must_use]
    pub const fn digital(&self, input: DigitalInput) -> bool {
        self.digital[input.index()]
    }

    #[inline]
    #[must_use]
    pub const fn analog(&self, input: AnalogInput) -> f32 {
        self.analog[input.index()]
    }

    /// Set a digital control. Used when building states for tests and
    /// simulated devices.
    #[inline]
    pub fn set_digital(&mut self, input: DigitalInput, active: bool) {
        self.digital[input.index()] = active;
    }

    #[inline]
    pub fn set_analog(&mut self, input: AnalogInput, value: f32) {
        self.analog[input.index()] = value;
    }

    /// Device uptime as a duration.
    #[inline]
    #[must_use]
    pub const fn uptime_duration(&self) -> Duration {
        Duration::from_micros(self.uptime)
    }
}
