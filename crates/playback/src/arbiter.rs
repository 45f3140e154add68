//! Playback arbitration.
//!
//! `Arbiter` owns the one piece of playback state, the track currently
//! playing, and is the only thing that issues `play_track` / `stop` to the
//! audio module. It has no clock: the caller feeds it classified tag events
//! and the grace monitor calls [`Arbiter::stop`] when a removal times out.
//!
//! Decision table for [`Arbiter::on_tag_event`]:
//!
//! | Event            | Song read   | Playing  | Action              |
//! |------------------|-------------|----------|---------------------|
//! | `Absent`         | -           | any      | none                |
//! | `SameTagPresent` | -           | any      | none                |
//! | `NewTag`         | error       | yes      | stop                |
//! | `NewTag`         | error       | no       | none                |
//! | `NewTag`         | `n`         | `n`      | none                |
//! | `NewTag`         | `n`         | `m != n` | stop, then play `n` |
//! | `NewTag`         | `n`         | no       | play `n`            |

use platform::{AudioPlayer, OutputPin, PinState};
use platform::log::{self, Dbg};
use tags::{SongNumber, SongSource, TagDataError, TagEvent};

/// What [`Arbiter::on_tag_event`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Event needed no action.
    Ignored,
    /// The tag carries the track already playing.
    Unchanged(SongNumber),
    /// Playback started from idle.
    Started(SongNumber),
    /// The previous track was stopped and a new one started.
    Switched {
        /// Track that was playing.
        from: SongNumber,
        /// Track now playing.
        to: SongNumber,
    },
    /// The tag had no usable song record. `stopped` is `true` when this
    /// ended playback.
    Rejected {
        /// Why the record was unusable.
        error: TagDataError,
        /// Whether a playing track was stopped.
        stopped: bool,
    },
}

/// Start/stop decision maker.
///
/// `current` is `Some` exactly while a track is playing.
#[derive(Debug, Default)]
pub struct Arbiter {
    current: Option<SongNumber>,
}

impl Arbiter {
    /// Idle arbiter.
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Track currently playing.
    pub fn current_track(&self) -> Option<SongNumber> {
        self.current
    }

    /// `true` while a track is playing.
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// React to one classified poll.
    ///
    /// The song record is read at most once per call.
    pub async fn on_tag_event<S, P, L>(
        &mut self,
        event: TagEvent,
        source: &mut S,
        player: &mut P,
        indicator: &mut L,
    ) -> Decision
    where
        S: SongSource,
        P: AudioPlayer,
        L: OutputPin,
    {
        let TagEvent::NewTag(uid) = event else {
            return Decision::Ignored;
        };

        let song = match source.read_song_number().await {
            Ok(song) => song,
            Err(error) => {
                log::warn!("tag {} rejected: {}", uid, error);
                let stopped = self.stop(player, indicator).await;
                return Decision::Rejected { error, stopped };
            }
        };

        match self.current {
            Some(playing) if playing == song => Decision::Unchanged(song),
            Some(playing) => {
                self.stop(player, indicator).await;
                self.start(song, player, indicator).await;
                Decision::Switched {
                    from: playing,
                    to: song,
                }
            }
            None => {
                self.start(song, player, indicator).await;
                Decision::Started(song)
            }
        }
    }

    /// Start `song`. Callers stop any playing track first.
    async fn start<P: AudioPlayer, L: OutputPin>(
        &mut self,
        song: SongNumber,
        player: &mut P,
        indicator: &mut L,
    ) {
        log::info!("play track {}", song);
        self.current = Some(song);
        if let Err(e) = player.play_track(song.track()).await {
            log::warn!("play_track({}) failed: {}", song, Dbg(&e));
        }
        let _ = indicator.set_state(PinState::High);
    }

    /// Stop playback. Returns `false`, issuing nothing, when already idle.
    pub async fn stop<P: AudioPlayer, L: OutputPin>(
        &mut self,
        player: &mut P,
        indicator: &mut L,
    ) -> bool {
        let Some(song) = self.current.take() else {
            return false;
        };
        log::info!("stop track {}", song);
        if let Err(e) = player.stop().await {
            log::warn!("stop failed: {}", Dbg(&e));
        }
        let _ = indicator.set_state(PinState::Low);
        true
    }
}
