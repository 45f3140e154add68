//! Button input events

/// Discrete events produced by the debounced button inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Button pressed (accepted, debounced falling edge)
    ButtonPress(Button),
}

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Volume up
    VolumeUp,
    /// Volume down
    VolumeDown,
}

impl Button {
    /// Volume step applied for one press of this button.
    pub fn volume_delta(self) -> i32 {
        match self {
            Self::VolumeUp => 1,
            Self::VolumeDown => -1,
        }
    }
}
