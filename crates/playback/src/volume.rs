//! Button-driven volume control on the audio module's 0–30 scale.
//!
//! Every step is clamped into the controller's range before it reaches the
//! audio module, and a step that does not change the level sends nothing:
//!
//! ```text
//! level 29 ─ +1 ─► 30  set_volume(30)
//! level 30 ─ +1 ─► 30  (no command)
//! ```

use platform::log::{self, Dbg};
use platform::{AudioPlayer, VolumeLevel};

/// Owns the current output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeController {
    level: VolumeLevel,
    min: VolumeLevel,
    max: VolumeLevel,
}

impl VolumeController {
    /// Controller spanning the whole scale, starting at `initial`.
    pub const fn new(initial: VolumeLevel) -> Self {
        Self {
            level: initial,
            min: VolumeLevel::MIN,
            max: VolumeLevel::MAX,
        }
    }

    /// Controller limited to `min..=max`. Swapped bounds are reordered and
    /// `initial` is pulled into range.
    pub fn with_range(initial: VolumeLevel, min: VolumeLevel, max: VolumeLevel) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            level: initial.clamp(min, max),
            min,
            max,
        }
    }

    /// Current level.
    pub fn level(&self) -> VolumeLevel {
        self.level
    }

    /// Step the level by `delta`, saturating at the range ends, and apply it.
    ///
    /// Returns the new level. Audio module errors are logged and dropped.
    pub async fn adjust<P: AudioPlayer>(&mut self, delta: i32, player: &mut P) -> u8 {
        let target = self.level.offset(delta).clamp(self.min, self.max);
        if target == self.level {
            return target.get();
        }
        self.level = target;
        log::info!("volume {}", target.get());
        if let Err(e) = player.set_volume(target).await {
            log::warn!("set_volume failed: {}", Dbg(&e));
        }
        target.get()
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new(VolumeLevel::DEFAULT)
    }
}
