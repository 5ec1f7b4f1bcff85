//! GPIO output abstraction
//!
//! Pin configuration (direction, pull mode) happens once at startup through
//! the board HAL; what the firmware components hold afterwards is an
//! [`OutputPort`] — the ability to drive a logic level on one already
//! configured pin. Exactly one component owns each port.

/// Logical pin identifier, as printed on the board silkscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl PinState {
    /// The opposite level.
    pub fn toggled(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Internal pull resistor configuration, used when a collaborator bus (e.g.
/// the sensor I2C pins) is configured at init time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor
    None,
    /// Pull-up
    Up,
    /// Pull-down
    Down,
}

/// Output pin operations on a pin already configured as push-pull output.
pub trait OutputPort {
    /// Error type
    type Error: core::fmt::Debug;

    /// Drive the pin to `state`.
    fn set_level(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Set pin high
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(PinState::High)
    }

    /// Set pin low
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(PinState::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_state_round_trips_through_bool() {
        assert_eq!(PinState::from(true), PinState::High);
        assert_eq!(PinState::from(false), PinState::Low);
        assert!(bool::from(PinState::High));
        assert!(!bool::from(PinState::Low));
    }

    #[test]
    fn toggled_flips_and_returns() {
        assert_eq!(PinState::High.toggled(), PinState::Low);
        assert_eq!(PinState::Low.toggled().toggled(), PinState::Low);
    }
}
