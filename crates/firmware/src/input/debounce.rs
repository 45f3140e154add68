//! Edge-triggered button debouncing.
//!
//! A press is accepted on an inactive→active transition, and only when the
//! previous accepted press of the same button is more than the window ago.
//! Holding a button produces one press; bounces inside the window are
//! swallowed.

use platform::{Button, InputEvent, Millis};

/// Debounce state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncedButton {
    button: Button,
    window_ms: u32,
    last_raw_active: bool,
    last_accepted_at: Option<Millis>,
}

impl DebouncedButton {
    /// Debouncer for `button` with a `window_ms` lockout after each press.
    pub const fn new(button: Button, window_ms: u32) -> Self {
        Self {
            button,
            window_ms,
            last_raw_active: false,
            last_accepted_at: None,
        }
    }

    /// The button this debouncer reports.
    pub fn button(&self) -> Button {
        self.button
    }

    /// Feed one raw sample (`true` = pressed).
    pub fn poll(&mut self, raw_active: bool, now: Millis) -> Option<InputEvent> {
        let rising = raw_active && !self.last_raw_active;
        self.last_raw_active = raw_active;
        if !rising {
            return None;
        }
        let outside_window = self
            .last_accepted_at
            .map_or(true, |at| now.since(at) > self.window_ms);
        if !outside_window {
            return None;
        }
        self.last_accepted_at = Some(now);
        Some(InputEvent::ButtonPress(self.button))
    }
}
