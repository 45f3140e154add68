//! Application identity constants
//!
//! Printed by the firmware's first log line and the desktop simulator's
//! header. Timing and volume tuning lives in `firmware::config`.

/// The application name
pub const APP_NAME: &str = "NFC Jukebox";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
