//! NFC jukebox firmware
//!
//! Plays the song stored on whichever NFC tag rests on the reader, and lets an
//! operator program tags over a serial console.
//!
//! # Architecture
//!
//! ```text
//! Entry point (main.rs: embassy executor, tick loop, watchdog)
//!         ↓
//! Controller (controller: commands → buttons → tag poll → grace check)
//!         ↓
//! Feature crates (tags, playback)
//!         ↓
//! Drivers (drivers: PN532 over I2C, DFPlayer over UART)
//!         ↓
//! Platform HAL (Embassy, STM32)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt)
//! - `emulator` - Build the desktop tag simulator (tokio, tracing)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! RUST_LOG=debug cargo run --example tag_simulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)] // controller generics: R, P, U, D, L, C, Y

pub mod boot;
pub mod command;
pub mod config;
pub mod console;
pub mod controller;
pub mod drivers;
pub mod hal;
pub mod input;
pub(crate) mod log;
pub mod mode;

// Re-export key types
pub use boot::{bring_up, BootError, WATCHDOG_TIMEOUT_MS};
pub use command::Command;
pub use config::{default_config, ConfigError, ControllerConfig};
pub use console::LineAssembler;
pub use controller::{Controller, Parts};
pub use drivers::{DfPlayer, DfPlayerError, Pn532, Pn532Error};
pub use hal::{HalInput, HalOutput};
pub use mode::{Mode, ModeError};
