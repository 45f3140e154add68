//! Hardware Abstraction Layer (HAL) for the NFC jukebox
//!
//! This crate provides trait-based abstractions for every collaborator the
//! playback core talks to, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: controller, drivers, bring-up)
//!         ↓
//! Feature Layers (tags, playback)
//!         ↓
//! Platform HAL (this crate - trait abstractions + newtypes)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Collaborators
//!
//! - [`TagReader`] - NFC transceiver (passive target polling, page I/O)
//! - [`AudioPlayer`] - Track-index audio module (play / stop / volume)
//! - [`Console`] - Line-oriented operator command channel
//! - [`gpio`] - Button inputs and the activity indicator output
//!
//! # Features
//!
//! - `std`: expose [`mocks`] outside this crate (tests, desktop simulator)
//! - `hardware`: physical hardware target marker
//! - `defmt`: enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{TagReadResult, TagReader};
//!
//! async fn example<R: TagReader>(reader: &mut R) {
//!     if let Ok(TagReadResult::Present(uid)) = reader.poll_tag(100).await {
//!         let _ = uid.len();
//!     }
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_types;
pub mod config;
pub mod console;
pub mod gpio;
pub mod input;
pub mod log;
pub mod nfc;
pub mod time;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main high-level traits
pub use audio::AudioPlayer;
pub use console::{CommandLine, Console, MAX_LINE_LEN};
pub use input::{Button, InputEvent};
pub use nfc::{Page, ReaderInfo, TagReadResult, TagReader, TagUid, PAGE_SIZE};

// Re-export newtypes
pub use audio_types::{OutOfRangeError, TrackIndex, VolumeLevel};
pub use time::Millis;

// Re-export GPIO types
pub use gpio::{InputPin, OutputPin, PinState};
