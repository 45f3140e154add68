//! Audio module abstraction
//!
//! The audio hardware is a self-contained decoder/amplifier that plays numbered
//! tracks from its own storage. Commands are fire-and-forget from the
//! caller's point of view: errors are reported so they can be logged, but the
//! playback core never retries them.

use crate::audio_types::{TrackIndex, VolumeLevel};

/// Track-index audio player trait
pub trait AudioPlayer {
    /// Error type
    type Error: core::fmt::Debug;

    /// Bring the module up and apply the start-up volume.
    ///
    /// Failure here is fatal for the application.
    fn init(
        &mut self,
        volume: VolumeLevel,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Start playing `track` from its beginning.
    fn play_track(
        &mut self,
        track: TrackIndex,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop playback.
    fn stop(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set the output volume.
    fn set_volume(
        &mut self,
        volume: VolumeLevel,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
