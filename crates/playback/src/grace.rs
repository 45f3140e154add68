//! Stop playback once a removed tag stays away too long.
//!
//! Poll gaps of a few hundred milliseconds are normal for a tag resting on
//! the reader, so `Absent` alone never stops anything. This monitor is the
//! only absence-driven stop path.

use platform::log;
use platform::{AudioPlayer, Millis, OutputPin};
use tags::PresenceState;

use crate::arbiter::Arbiter;

/// Absence timeout check, evaluated every scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceMonitor {
    period_ms: u32,
}

impl GraceMonitor {
    /// Default tolerated absence.
    pub const DEFAULT_PERIOD_MS: u32 = 2000;

    /// Monitor tolerating `period_ms` of absence.
    pub const fn new(period_ms: u32) -> Self {
        Self { period_ms }
    }

    /// Tolerated absence in milliseconds.
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// `true` when the tag is gone, something plays, and the last sighting
    /// is strictly more than the period ago.
    pub fn expired(&self, now: Millis, presence: &PresenceState, playing: bool) -> bool {
        !presence.is_present()
            && playing
            && now.since(presence.last_seen_at()) > self.period_ms
    }

    /// Stop playback through the arbiter if the grace period has run out.
    ///
    /// Returns `true` when a stop was issued.
    pub async fn tick<P: AudioPlayer, L: OutputPin>(
        &self,
        now: Millis,
        presence: &PresenceState,
        arbiter: &mut Arbiter,
        player: &mut P,
        indicator: &mut L,
    ) -> bool {
        if !self.expired(now, presence, arbiter.is_playing()) {
            return false;
        }
        log::info!(
            "tag absent {} ms, stopping",
            now.since(presence.last_seen_at())
        );
        arbiter.stop(player, indicator).await
    }
}

impl Default for GraceMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD_MS)
    }
}
