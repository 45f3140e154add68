//! GPIO pin abstraction
//!
//! The jukebox needs two sampled button inputs (active-low, pulled up) and
//! one discrete output for the activity indicator.

/// Input pin operations
pub trait InputPin {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read pin state
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Read pin state (inverted)
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

/// Output pin operations
pub trait OutputPin {
    /// Error type
    type Error: core::fmt::Debug;

    /// Set pin high
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Set pin low
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Set pin state
    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::High => self.set_high(),
            PinState::Low => self.set_low(),
        }
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
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
