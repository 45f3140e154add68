//! Property-based tests for button debouncing.
//! Verifies the press rules hold across arbitrary sample sequences, including
//! sequences that straddle the millisecond clock wrap.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use firmware::input::{Button, DebouncedButton, InputEvent, VolumeButtons};
use platform::mocks::MockPin;
use platform::Millis;
use proptest::prelude::*;

const WINDOW_MS: u32 = 200;

fn at(start: u32, offset: u32) -> Millis {
    Millis::from_ticks(start.wrapping_add(offset))
}

/// Raw samples as (pressed, gap since previous sample in ms).
fn samples(max_gap: u32, len: usize) -> impl Strategy<Value = Vec<(bool, u32)>> {
    proptest::collection::vec((any::<bool>(), 1..=max_gap), 1..len)
}

proptest! {
    /// However the line bounces, a span no longer than the window yields at
    /// most one press.
    #[test]
    fn edges_inside_one_window_accept_at_most_one(
        start in any::<u32>(),
        mut offsets in proptest::collection::vec((any::<bool>(), 0..=WINDOW_MS), 1..64),
    ) {
        offsets.sort_by_key(|(_, off)| *off);
        let mut button = DebouncedButton::new(Button::VolumeUp, WINDOW_MS);
        let presses = offsets
            .iter()
            .filter(|(raw, off)| button.poll(*raw, at(start, *off)).is_some())
            .count();
        prop_assert!(presses <= 1, "{} presses inside {} ms", presses, WINDOW_MS);
    }

    /// Once a button is held, it reports at most one press however long the
    /// hold lasts.
    #[test]
    fn held_button_never_repeats(
        start in any::<u32>(),
        prefix in samples(500, 32),
        hold in proptest::collection::vec(1..5_000u32, 1..64),
    ) {
        let mut button = DebouncedButton::new(Button::VolumeDown, WINDOW_MS);
        let mut t = start;
        for (raw, gap) in &prefix {
            t = t.wrapping_add(*gap);
            button.poll(*raw, Millis::from_ticks(t));
        }

        let mut presses = 0;
        for gap in &hold {
            t = t.wrapping_add(*gap);
            if button.poll(true, Millis::from_ticks(t)).is_some() {
                presses += 1;
            }
        }
        prop_assert!(presses <= 1);
    }

    /// Clean press/release cycles spaced beyond the window are never dropped.
    #[test]
    fn presses_spaced_past_window_all_count(
        start in any::<u32>(),
        gaps in proptest::collection::vec(WINDOW_MS + 1..3_000, 1..32),
    ) {
        let mut button = DebouncedButton::new(Button::VolumeUp, WINDOW_MS);
        let mut t = start;
        for gap in &gaps {
            t = t.wrapping_add(*gap);
            prop_assert_eq!(
                button.poll(true, Millis::from_ticks(t)),
                Some(InputEvent::ButtonPress(Button::VolumeUp))
            );
            button.poll(false, Millis::from_ticks(t.wrapping_add(1)));
        }
    }

    /// Each button of the pair behaves exactly like a lone debouncer fed only
    /// its own pin, whatever the other button does.
    #[test]
    fn buttons_debounce_independently(
        start in any::<u32>(),
        script in proptest::collection::vec((any::<bool>(), any::<bool>(), 1..400u32), 1..96),
    ) {
        let mut pair = VolumeButtons::new(MockPin::new(true), MockPin::new(true), WINDOW_MS);
        let mut lone_up = DebouncedButton::new(Button::VolumeUp, WINDOW_MS);
        let mut lone_down = DebouncedButton::new(Button::VolumeDown, WINDOW_MS);

        let mut t = start;
        for (up, down, gap) in &script {
            t = t.wrapping_add(*gap);
            let now = Millis::from_ticks(t);
            // Active low: pressed pulls the pin down.
            pair.up_pin_mut().set_level(!*up);
            pair.down_pin_mut().set_level(!*down);

            let [up_event, down_event] = pair.poll(now);
            prop_assert_eq!(up_event, lone_up.poll(*up, now));
            prop_assert_eq!(down_event, lone_down.poll(*down, now));
        }
    }
}
