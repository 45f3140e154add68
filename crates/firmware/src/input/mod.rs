//! Volume button sampling.
//!
//! Both buttons are wired active-low with pull-ups. [`VolumeButtons`] samples
//! the raw pins once per scheduler tick and runs each through its own
//! [`DebouncedButton`]; the two buttons never share timing state.
//!
//! # Example
//!
//! ```
//! use firmware::input::VolumeButtons;
//! use platform::mocks::MockPin;
//! use platform::Millis;
//!
//! let mut buttons = VolumeButtons::new(MockPin::new(true), MockPin::new(true), 200);
//! buttons.up_pin_mut().set_level(false); // pressed
//! let [up, down] = buttons.poll(Millis::from_ticks(0));
//! assert!(up.is_some() && down.is_none());
//! ```

pub mod debounce;

pub use debounce::DebouncedButton;
pub use platform::{Button, InputEvent};

use platform::{InputPin, Millis};

/// The volume-up / volume-down button pair.
pub struct VolumeButtons<U, D> {
    up_pin: U,
    down_pin: D,
    up: DebouncedButton,
    down: DebouncedButton,
}

impl<U: InputPin, D: InputPin> VolumeButtons<U, D> {
    /// Pair two active-low pins with a shared debounce window length.
    pub fn new(up_pin: U, down_pin: D, debounce_ms: u32) -> Self {
        Self {
            up_pin,
            down_pin,
            up: DebouncedButton::new(Button::VolumeUp, debounce_ms),
            down: DebouncedButton::new(Button::VolumeDown, debounce_ms),
        }
    }

    /// Sample both pins. Index 0 is volume-up, index 1 volume-down.
    ///
    /// A pin read error counts as "not pressed".
    pub fn poll(&mut self, now: Millis) -> [Option<InputEvent>; 2] {
        let up_active = self.up_pin.is_low().unwrap_or(false);
        let down_active = self.down_pin.is_low().unwrap_or(false);
        [self.up.poll(up_active, now), self.down.poll(down_active, now)]
    }

    /// Volume-up pin.
    pub fn up_pin_mut(&mut self) -> &mut U {
        &mut self.up_pin
    }

    /// Volume-down pin.
    pub fn down_pin_mut(&mut self) -> &mut D {
        &mut self.down_pin
    }
}
