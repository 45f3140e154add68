//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumeLevel`: clamps 0–30, the audio module's native volume scale
//! - `TrackIndex`: validates 1–2999, the module's addressable track range

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{value} is outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: i32,
    /// The inclusive minimum allowed value.
    pub min: i32,
    /// The inclusive maximum allowed value.
    pub max: i32,
}

// ── VolumeLevel ──────────────────────────────────────────────────────────────

/// Output volume on the audio module's 0–30 scale.
///
/// Wraps a `u8` with the invariant `MIN <= value <= MAX`.
/// Construct with [`VolumeLevel::new`] (clamping) or
/// [`VolumeLevel::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Quietest level (muted).
    pub const MIN: Self = Self(0);
    /// Loudest level.
    pub const MAX: Self = Self(30);
    /// Level applied at start-up.
    pub const DEFAULT: Self = Self(20);

    /// Create a `VolumeLevel`, clamping values above [`VolumeLevel::MAX`].
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    /// Create a `VolumeLevel`, returning an error if `value` exceeds the scale.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 30`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX.0 {
            Err(OutOfRangeError {
                value: i32::from(value),
                min: i32::from(Self::MIN.0),
                max: i32::from(Self::MAX.0),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Apply a relative step, saturating at both ends of the scale.
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        let target = i32::from(self.0).saturating_add(delta);
        let clamped = target.clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0));
        // Clamped into 0..=30 above, always fits a u8.
        Self(u8::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    /// Return the inner level (0–30).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for VolumeLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── TrackIndex ───────────────────────────────────────────────────────────────

/// One-based index of a track on the audio module's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct TrackIndex(u16);

impl TrackIndex {
    /// First addressable track.
    pub const MIN_INDEX: u16 = 1;
    /// Last addressable track.
    pub const MAX_INDEX: u16 = 2999;

    /// Create a `TrackIndex`, returning an error outside 1–2999.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `index == 0` or `index > 2999`.
    pub fn new(index: u16) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_INDEX..=Self::MAX_INDEX).contains(&index) {
            Ok(Self(index))
        } else {
            Err(OutOfRangeError {
                value: i32::from(index),
                min: i32::from(Self::MIN_INDEX),
                max: i32::from(Self::MAX_INDEX),
            })
        }
    }

    /// Create a `TrackIndex`, clamping into 1–2999.
    #[must_use]
    pub const fn clamped(index: u16) -> Self {
        if index < Self::MIN_INDEX {
            Self(Self::MIN_INDEX)
        } else if index > Self::MAX_INDEX {
            Self(Self::MAX_INDEX)
        } else {
            Self(index)
        }
    }

    /// Return the one-based index.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}
