//! Peripheral drivers behind the platform traits.
//!
//! | Driver                 | Bus         | Implements              |
//! |------------------------|-------------|-------------------------|
//! | [`pn532::Pn532`]       | I²C, 0x24   | [`platform::TagReader`] |
//! | [`dfplayer::DfPlayer`] | UART 9600 8N1 | [`platform::AudioPlayer`] |
//!
//! Both are written against `embedded-hal-async` / `embedded-io-async`, so
//! host tests drive them with `embedded-hal-mock` and in-memory writers.

pub mod dfplayer;
pub mod pn532;

pub use dfplayer::{DfPlayer, DfPlayerError};
pub use pn532::{Pn532, Pn532Error};
