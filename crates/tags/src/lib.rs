//! Tag-side logic for the NFC jukebox
//!
//! - [`presence`]: turns raw poll results into tag appeared / still there /
//!   gone events
//! - [`record`]: the 4-byte song record stored on page 4
//! - [`memory`]: reading and writing that record through a [`platform::TagReader`]
//! - [`retry`]: bounded waiting for a tag during interactive write/read
//!
//! Everything here is `no_std` and allocation-free.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;
pub mod presence;
pub mod record;
pub mod retry;

pub use memory::{read_song_number, write_song_number, SongSource};
pub use presence::{classify, PresenceState, TagEvent};
pub use record::{SongNumber, TagDataError, SONG_MAGIC, SONG_RECORD_PAGE};
pub use retry::{wait_for_tag, RetryPolicy, TimeoutError};
