//! Tag identity tracking.
//!
//! Each poll of the reader yields a raw [`TagReadResult`]. [`classify`] turns
//! that into a [`TagEvent`] by edge-detecting on UID identity:
//!
//! ```text
//!            Present(uid), !present || uid != last_uid
//!   ┌──────────────────────────────────────────────────► NewTag(uid)
//!   │
//! poll ─── Present(uid), present && uid == last_uid ───► SameTagPresent
//!   │
//!   └── NoTag ─────────────────────────────────────────► Absent
//! ```
//!
//! No time window is applied here. Removal and re-insertion are already rate
//! limited by the poll interval; the grace period lives in the playback crate.
//!
//! `present` and `last_uid` are tracked separately on purpose: `NoTag` clears
//! the flag but keeps the UID, so "last known tag" and "currently detected"
//! never get conflated. Re-presenting the same tag after an `Absent` is a
//! `NewTag` again.

use platform::{Millis, TagReadResult, TagUid};

/// Classified result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagEvent {
    /// No tag answered this poll.
    Absent,
    /// The tag seen on the previous poll is still there.
    SameTagPresent,
    /// A tag appeared, or a different tag replaced the previous one.
    NewTag(TagUid),
}

/// What the tracker knows about the field.
///
/// Mutated only through [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresenceState {
    last_uid: Option<TagUid>,
    last_seen_at: Millis,
    present: bool,
}

impl PresenceState {
    /// Nothing seen yet.
    pub const fn new() -> Self {
        Self {
            last_uid: None,
            last_seen_at: Millis::ZERO,
            present: false,
        }
    }

    /// UID of the most recently classified tag, kept across `Absent` polls.
    pub fn last_uid(&self) -> Option<TagUid> {
        self.last_uid
    }

    /// Timestamp of the last poll that saw any tag.
    pub fn last_seen_at(&self) -> Millis {
        self.last_seen_at
    }

    /// `true` if the most recent poll saw a tag.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Forget everything, as after a restart.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Classify one poll result and update `presence`.
pub fn classify(read: TagReadResult, now: Millis, presence: &mut PresenceState) -> TagEvent {
    match read {
        TagReadResult::NoTag => {
            presence.present = false;
            TagEvent::Absent
        }
        TagReadResult::Present(uid) => {
            let is_new = !presence.present || presence.last_uid != Some(uid);
            presence.last_seen_at = now;
            presence.present = true;
            if is_new {
                presence.last_uid = Some(uid);
                TagEvent::NewTag(uid)
            } else {
                TagEvent::SameTagPresent
            }
        }
    }
}
