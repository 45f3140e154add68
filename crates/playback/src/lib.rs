//! Playback decisions for the NFC jukebox: tag events to play/stop, volume
//! steps and the tag-removal grace period
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![allow(async_fn_in_trait)]

pub mod arbiter;
pub mod grace;
pub mod volume;

pub use arbiter::{Arbiter, Decision};
pub use grace::GraceMonitor;
pub use volume::VolumeController;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use platform::mocks::{AudioCommand, MockAudioPlayer, MockPin, MockTagReader};
    use platform::{Millis, PinState, TagReadResult, TagUid};
    use tags::{classify, PresenceState, SongNumber, SongSource, TagDataError, TagEvent};

    const TAG_A: [u8; 4] = [0x04, 0xA1, 0xB2, 0xC3];
    const TAG_B: [u8; 4] = [0x04, 0xA1, 0xB2, 0xC4];

    fn uid(bytes: &[u8]) -> TagUid {
        TagUid::from_slice(bytes).unwrap()
    }

    fn song(n: i32) -> SongNumber {
        SongNumber::new(n).unwrap()
    }

    /// Reader with tag A carrying song 3 and tag B carrying song 8.
    fn shelf() -> MockTagReader {
        let mut reader = MockTagReader::new();
        reader.add_tag(&TAG_A, *b"SON\x03").unwrap();
        reader.add_tag(&TAG_B, *b"SON\x08").unwrap();
        reader
    }

    /// Song source that counts reads and replays one fixed answer.
    struct Scripted {
        answer: Result<SongNumber, TagDataError>,
        reads: usize,
    }

    impl SongSource for Scripted {
        async fn read_song_number(&mut self) -> Result<SongNumber, TagDataError> {
            self.reads += 1;
            self.answer
        }
    }

    /// Arbiter tests
    mod arbiter_tests {
        use super::*;
        use crate::arbiter::{Arbiter, Decision};

        #[tokio::test]
        async fn test_new_tag_starts_playback_and_lights_indicator() {
            let mut reader = shelf();
            reader.place(&TAG_A);
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);

            let decision = arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut reader, &mut player, &mut led)
                .await;

            assert_eq!(decision, Decision::Started(song(3)));
            assert_eq!(player.commands(), &[AudioCommand::Play(3)]);
            assert_eq!(arbiter.current_track(), Some(song(3)));
            assert_eq!(led.level(), PinState::High);
        }

        #[tokio::test]
        async fn test_absent_and_same_tag_do_nothing() {
            let mut source = Scripted {
                answer: Ok(song(1)),
                reads: 0,
            };
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);

            for event in [TagEvent::Absent, TagEvent::SameTagPresent] {
                let decision = arbiter
                    .on_tag_event(event, &mut source, &mut player, &mut led)
                    .await;
                assert_eq!(decision, Decision::Ignored);
            }
            assert_eq!(source.reads, 0);
            assert!(player.commands().is_empty());
            assert_eq!(led.writes(), 0);
        }

        #[tokio::test]
        async fn test_swap_stops_before_starting() {
            let mut reader = shelf();
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);

            reader.place(&TAG_A);
            arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut reader, &mut player, &mut led)
                .await;
            reader.place(&TAG_B);
            let decision = arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_B)), &mut reader, &mut player, &mut led)
                .await;

            assert_eq!(
                decision,
                Decision::Switched {
                    from: song(3),
                    to: song(8)
                }
            );
            assert_eq!(
                player.commands(),
                &[AudioCommand::Play(3), AudioCommand::Stop, AudioCommand::Play(8)]
            );
            assert_eq!(led.level(), PinState::High);
        }

        #[tokio::test]
        async fn test_same_song_on_new_tag_issues_nothing() {
            let mut source = Scripted {
                answer: Ok(song(5)),
                reads: 0,
            };
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);

            arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut source, &mut player, &mut led)
                .await;
            player.clear();
            let decision = arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut source, &mut player, &mut led)
                .await;

            assert_eq!(decision, Decision::Unchanged(song(5)));
            assert!(player.commands().is_empty());
            assert_eq!(source.reads, 2);
        }

        #[tokio::test]
        async fn test_unprogrammed_tag_stops_playback() {
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);
            let mut good = Scripted {
                answer: Ok(song(2)),
                reads: 0,
            };
            let mut blank = Scripted {
                answer: Err(TagDataError::NotProgrammed),
                reads: 0,
            };

            arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut good, &mut player, &mut led)
                .await;
            let decision = arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_B)), &mut blank, &mut player, &mut led)
                .await;

            assert_eq!(
                decision,
                Decision::Rejected {
                    error: TagDataError::NotProgrammed,
                    stopped: true
                }
            );
            assert_eq!(player.commands(), &[AudioCommand::Play(2), AudioCommand::Stop]);
            assert!(!arbiter.is_playing());
            assert_eq!(led.level(), PinState::Low);
        }

        #[tokio::test]
        async fn test_read_error_while_idle_starts_nothing() {
            let mut reader = shelf();
            reader.place(&TAG_A);
            reader.set_fail_reads(true);
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);

            let decision = arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut reader, &mut player, &mut led)
                .await;

            assert_eq!(
                decision,
                Decision::Rejected {
                    error: TagDataError::ReadFailed,
                    stopped: false
                }
            );
            assert!(player.commands().is_empty());
            assert_eq!(reader.read_count(), 1);
        }

        #[tokio::test]
        async fn test_stop_is_idempotent() {
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);
            assert!(!arbiter.stop(&mut player, &mut led).await);
            assert!(player.commands().is_empty());
            assert_eq!(led.writes(), 0);
        }

        #[tokio::test]
        async fn test_player_errors_do_not_block_state_change() {
            let mut source = Scripted {
                answer: Ok(song(4)),
                reads: 0,
            };
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            player.set_fail_commands(true);
            let mut led = MockPin::new(false);

            arbiter
                .on_tag_event(TagEvent::NewTag(uid(&TAG_A)), &mut source, &mut player, &mut led)
                .await;
            assert_eq!(arbiter.current_track(), Some(song(4)));
            assert!(arbiter.stop(&mut player, &mut led).await);
            assert!(!arbiter.is_playing());
        }
    }

    /// Grace period tests
    mod grace_tests {
        use super::*;
        use crate::arbiter::Arbiter;
        use crate::grace::GraceMonitor;

        async fn playing_since(
            seen_at: u32,
        ) -> (PresenceState, Arbiter, MockAudioPlayer, MockPin) {
            let mut presence = PresenceState::new();
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);
            let mut source = Scripted {
                answer: Ok(song(6)),
                reads: 0,
            };
            let event = classify(
                TagReadResult::Present(uid(&TAG_A)),
                Millis::from_ticks(seen_at),
                &mut presence,
            );
            arbiter
                .on_tag_event(event, &mut source, &mut player, &mut led)
                .await;
            player.clear();
            (presence, arbiter, player, led)
        }

        #[tokio::test]
        async fn test_redetected_within_grace_never_stops() {
            let (mut presence, mut arbiter, mut player, mut led) = playing_since(0).await;
            let monitor = GraceMonitor::default();

            classify(TagReadResult::NoTag, Millis::from_ticks(200), &mut presence);
            for t in (200..1500).step_by(10) {
                monitor
                    .tick(Millis::from_ticks(t), &presence, &mut arbiter, &mut player, &mut led)
                    .await;
            }
            classify(
                TagReadResult::Present(uid(&TAG_A)),
                Millis::from_ticks(1500),
                &mut presence,
            );
            for t in (1500..5000).step_by(10) {
                monitor
                    .tick(Millis::from_ticks(t), &presence, &mut arbiter, &mut player, &mut led)
                    .await;
            }

            assert_eq!(player.stop_count(), 0);
            assert!(arbiter.is_playing());
        }

        #[tokio::test]
        async fn test_exactly_one_stop_after_grace_expires() {
            let (mut presence, mut arbiter, mut player, mut led) = playing_since(0).await;
            let monitor = GraceMonitor::default();
            classify(TagReadResult::NoTag, Millis::from_ticks(10), &mut presence);

            let mut stopped_at = None;
            for t in (0..=2500).step_by(10) {
                let stopped = monitor
                    .tick(Millis::from_ticks(t), &presence, &mut arbiter, &mut player, &mut led)
                    .await;
                if stopped {
                    assert!(stopped_at.is_none(), "stopped twice");
                    stopped_at = Some(t);
                }
            }

            assert_eq!(stopped_at, Some(2010));
            assert_eq!(player.stop_count(), 1);
            assert_eq!(led.level(), PinState::Low);
        }

        #[tokio::test]
        async fn test_boundary_is_strictly_greater() {
            let (mut presence, mut arbiter, mut player, mut led) = playing_since(1000).await;
            let monitor = GraceMonitor::default();
            classify(TagReadResult::NoTag, Millis::from_ticks(1200), &mut presence);

            assert!(
                !monitor
                    .tick(Millis::from_ticks(3000), &presence, &mut arbiter, &mut player, &mut led)
                    .await
            );
            assert!(
                monitor
                    .tick(Millis::from_ticks(3001), &presence, &mut arbiter, &mut player, &mut led)
                    .await
            );
        }

        #[tokio::test]
        async fn test_elapsed_survives_clock_wrap() {
            let seen = u32::MAX - 500;
            let (mut presence, mut arbiter, mut player, mut led) = playing_since(seen).await;
            let monitor = GraceMonitor::default();
            classify(TagReadResult::NoTag, Millis::from_ticks(u32::MAX), &mut presence);

            // 1000 ms after the sighting, across the wrap.
            assert!(
                !monitor
                    .tick(Millis::from_ticks(499), &presence, &mut arbiter, &mut player, &mut led)
                    .await
            );
            // 2001 ms after.
            assert!(
                monitor
                    .tick(Millis::from_ticks(1500), &presence, &mut arbiter, &mut player, &mut led)
                    .await
            );
        }

        #[tokio::test]
        async fn test_idle_player_is_left_alone() {
            let presence = PresenceState::new();
            let mut arbiter = Arbiter::new();
            let mut player = MockAudioPlayer::new();
            let mut led = MockPin::new(false);
            let monitor = GraceMonitor::default();
            assert!(
                !monitor
                    .tick(Millis::from_ticks(60_000), &presence, &mut arbiter, &mut player, &mut led)
                    .await
            );
            assert!(player.commands().is_empty());
        }
    }

    /// Volume tests
    mod volume_tests {
        use super::*;
        use crate::volume::VolumeController;
        use platform::VolumeLevel;

        #[tokio::test]
        async fn test_up_presses_clamp_at_max_without_extra_commands() {
            let mut volume = VolumeController::default();
            let mut player = MockAudioPlayer::new();
            for _ in 0..15 {
                volume.adjust(1, &mut player).await;
            }
            assert_eq!(volume.level(), VolumeLevel::MAX);
            assert_eq!(player.volume_count(), 10);
            assert_eq!(player.commands().last(), Some(&AudioCommand::Volume(30)));
        }

        #[tokio::test]
        async fn test_down_from_zero_stays_at_zero() {
            let mut volume = VolumeController::new(VolumeLevel::MIN);
            let mut player = MockAudioPlayer::new();
            assert_eq!(volume.adjust(-1, &mut player).await, 0);
            assert_eq!(player.volume_count(), 0);
        }

        #[tokio::test]
        async fn test_each_step_sends_new_level() {
            let mut volume = VolumeController::default();
            let mut player = MockAudioPlayer::new();
            assert_eq!(volume.adjust(1, &mut player).await, 21);
            assert_eq!(volume.adjust(-1, &mut player).await, 20);
            assert_eq!(
                player.commands(),
                &[AudioCommand::Volume(21), AudioCommand::Volume(20)]
            );
        }

        #[tokio::test]
        async fn test_limited_range() {
            let mut volume = VolumeController::with_range(
                VolumeLevel::new(20),
                VolumeLevel::new(25),
                VolumeLevel::new(5),
            );
            let mut player = MockAudioPlayer::new();
            assert_eq!(volume.adjust(10, &mut player).await, 25);
            assert_eq!(volume.adjust(1, &mut player).await, 25);
            assert_eq!(player.volume_count(), 1);
        }

        #[tokio::test]
        async fn test_player_error_still_updates_level() {
            let mut volume = VolumeController::default();
            let mut player = MockAudioPlayer::new();
            player.set_fail_commands(true);
            assert_eq!(volume.adjust(1, &mut player).await, 21);
            assert_eq!(volume.level().get(), 21);
        }
    }
}
