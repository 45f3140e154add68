//! Controller tuning and board wiring.
//!
//! Everything is compile-time: [`default_config`] is a `const fn` and the
//! entry point validates it once before the control loop starts.

use platform::VolumeLevel;
use tags::RetryPolicy;

use crate::boot::WATCHDOG_TIMEOUT_MS;

/// A configuration the controller cannot run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tag polling needs a non-zero interval.
    #[error("poll interval must be non-zero")]
    ZeroPollInterval,
    /// A single poll may not outlast the interval between polls.
    #[error("poll timeout {timeout_ms} ms exceeds poll interval {interval_ms} ms")]
    PollTimeoutTooLong {
        /// Configured per-poll timeout.
        timeout_ms: u32,
        /// Configured interval.
        interval_ms: u32,
    },
    /// The grace period must cover at least one missed poll.
    #[error("grace period {0} ms is shorter than one poll interval")]
    GraceTooShort(u32),
    /// Volume bounds outside the 0–30 scale or in the wrong order.
    #[error("volume range {min}..={max} is invalid")]
    VolumeRange {
        /// Configured minimum.
        min: u8,
        /// Configured maximum.
        max: u8,
    },
    /// Start-up volume outside the configured bounds.
    #[error("default volume {0} is outside the volume range")]
    DefaultVolume(u8),
    /// Write/read interactions need at least one poll attempt.
    #[error("retry policy has no attempts")]
    NoRetryAttempts,
    /// An interactive write/read would starve the watchdog.
    #[error("worst-case stall {0} ms would trip the watchdog")]
    StallExceedsWatchdog(u32),
}

/// Timing and volume parameters of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Scheduler tick period.
    pub tick_ms: u32,
    /// Minimum time between two tag polls.
    pub poll_interval_ms: u32,
    /// Transceiver timeout for one play-mode poll.
    pub poll_timeout_ms: u32,
    /// Absence tolerated before playback stops.
    pub grace_period_ms: u32,
    /// Minimum time between two accepted presses of one button.
    pub debounce_ms: u32,
    /// Volume applied at start-up.
    pub default_volume: u8,
    /// Lowest reachable volume.
    pub min_volume: u8,
    /// Highest reachable volume.
    pub max_volume: u8,
    /// Tag wait during `write` / `read`.
    pub retry: RetryPolicy,
    /// Pause after a page write before returning to play mode.
    pub write_settle_ms: u32,
}

/// The shipped configuration.
pub const fn default_config() -> ControllerConfig {
    ControllerConfig {
        tick_ms: 10,
        poll_interval_ms: 200,
        poll_timeout_ms: 100,
        grace_period_ms: 2000,
        debounce_ms: 200,
        default_volume: 20,
        min_volume: 0,
        max_volume: 30,
        retry: RetryPolicy::DEFAULT,
        write_settle_ms: 100,
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        default_config()
    }
}

impl ControllerConfig {
    /// Check the parameters against each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.poll_timeout_ms > self.poll_interval_ms {
            return Err(ConfigError::PollTimeoutTooLong {
                timeout_ms: self.poll_timeout_ms,
                interval_ms: self.poll_interval_ms,
            });
        }
        if self.grace_period_ms < self.poll_interval_ms {
            return Err(ConfigError::GraceTooShort(self.grace_period_ms));
        }
        if self.min_volume > self.max_volume || self.max_volume > VolumeLevel::MAX.get() {
            return Err(ConfigError::VolumeRange {
                min: self.min_volume,
                max: self.max_volume,
            });
        }
        if !(self.min_volume..=self.max_volume).contains(&self.default_volume) {
            return Err(ConfigError::DefaultVolume(self.default_volume));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::NoRetryAttempts);
        }
        let stall = self.worst_case_stall_ms();
        if stall >= WATCHDOG_TIMEOUT_MS {
            return Err(ConfigError::StallExceedsWatchdog(stall));
        }
        Ok(())
    }

    /// Longest a single tick can block: a full write wait plus the settle delay.
    pub fn worst_case_stall_ms(&self) -> u32 {
        self.retry
            .worst_case_ms()
            .saturating_add(self.write_settle_ms)
    }

    /// Start-up volume as a typed level.
    pub fn default_level(&self) -> VolumeLevel {
        VolumeLevel::new(self.default_volume)
    }

    /// Lowest volume as a typed level.
    pub fn min_level(&self) -> VolumeLevel {
        VolumeLevel::new(self.min_volume)
    }

    /// Highest volume as a typed level.
    pub fn max_level(&self) -> VolumeLevel {
        VolumeLevel::new(self.max_volume)
    }
}

/// Board wiring (NUCLEO-H743ZI).
///
/// | Function            | Peripheral | Pins                  |
/// |---------------------|------------|-----------------------|
/// | PN532 transceiver   | I2C1       | PB8 SCL, PB9 SDA      |
/// | DFPlayer Mini       | USART2     | PD5 TX (9600 8N1)     |
/// | Operator console    | USART3     | PD8 TX, PD9 RX (VCP)  |
/// | Volume up button    | GPIO       | PG0, active-low       |
/// | Volume down button  | GPIO       | PG1, active-low       |
/// | Activity LED        | GPIO       | PB0 (LD1)             |
pub mod pins {
    /// 7-bit I2C address of the PN532.
    pub const PN532_I2C_ADDR: u8 = 0x24;
    /// PN532 I2C bus clock.
    pub const PN532_I2C_HZ: u32 = 100_000;
    /// DFPlayer Mini UART baud rate.
    pub const DFPLAYER_BAUD: u32 = 9600;
    /// Console UART baud rate.
    pub const CONSOLE_BAUD: u32 = 115_200;
}
