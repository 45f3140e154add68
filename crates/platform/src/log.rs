//! Logging front-end shared by the workspace crates.
//!
//! The macros forward to `defmt` on the target and to `tracing` in the
//! desktop simulator, and expand to nothing otherwise. They expand inside the
//! calling crate, so the backend is picked by the caller's own `defmt` and
//! `tracing` features; every crate using them declares both features and the
//! matching optional dependencies.
//!
//! Format strings must stay within the common subset of both backends: plain
//! `{}` placeholders, with arguments implementing both `Display` and
//! `defmt::Format`. Values that only implement `Debug`, such as generic
//! driver errors, go through [`Dbg`].
//!
//! ```
//! use platform::log::{self, Dbg};
//!
//! let err = std::io::ErrorKind::TimedOut;
//! log::warn!("poll failed: {}", Dbg(&err));
//! ```

use core::fmt;

/// Logs a `Debug`-only value with either backend.
pub struct Dbg<'a, T: fmt::Debug>(pub &'a T);

impl<T: fmt::Debug> fmt::Display for Dbg<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl<T: fmt::Debug> defmt::Format for Dbg<'_, T> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", defmt::Debug2Format(self.0));
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($defmt:ident, $tracing:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$defmt!($($arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        tracing::$tracing!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            if false {
                let _ = ::core::format_args!($($arg)*);
            }
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_trace {
    ($($arg:tt)*) => { $crate::__log_at!(trace, trace, $($arg)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_debug {
    ($($arg:tt)*) => { $crate::__log_at!(debug, debug, $($arg)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_info {
    ($($arg:tt)*) => { $crate::__log_at!(info, info, $($arg)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_warn {
    ($($arg:tt)*) => { $crate::__log_at!(warn, warn, $($arg)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_error {
    ($($arg:tt)*) => { $crate::__log_at!(error, error, $($arg)*) };
}

pub use crate::{
    __log_debug as debug, __log_error as error, __log_info as info, __log_trace as trace,
    __log_warn as warn,
};
