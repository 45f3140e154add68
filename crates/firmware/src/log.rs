//! Logging front-end, see [`platform::log`].
//!
//! `hardware` builds log through `defmt`, `emulator` builds through `tracing`.

pub(crate) use platform::log::{debug, error, info, warn, Dbg};
