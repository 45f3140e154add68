//! Monotonic millisecond timestamps.
//!
//! The tick counter is 32 bits wide and wraps after ~49.7 days of uptime.
//! All elapsed-time arithmetic goes through [`Millis::since`], which is
//! wraparound-safe as long as the two instants are less than one full counter
//! period apart.

/// Milliseconds since start-up, from a monotonic (never wall-clock) source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Millis(u32);

impl Millis {
    /// Start-up instant.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw tick count.
    pub const fn from_ticks(ms: u32) -> Self {
        Self(ms)
    }

    /// Build from a wider counter (e.g. `embassy_time::Instant::as_millis`),
    /// keeping the low 32 bits.
    #[allow(clippy::cast_possible_truncation)] // truncation is the wrap
    pub const fn from_u64(ms: u64) -> Self {
        Self(ms as u32)
    }

    /// Raw tick count.
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, modulo 2³².
    pub const fn since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The instant `ms` milliseconds after `self`, modulo 2³².
    #[must_use]
    pub const fn plus(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}
