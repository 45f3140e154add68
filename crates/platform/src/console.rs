//! Operator console abstraction
//!
//! A line-oriented text channel (a UART on hardware, stdin on the desktop
//! simulator). Reading is a non-blocking check so the control loop never
//! stalls waiting for the operator.

/// Longest command line accepted from the operator, in bytes.
pub const MAX_LINE_LEN: usize = 32;

/// One complete line of operator input, without its terminator.
pub type CommandLine = heapless::String<MAX_LINE_LEN>;

/// Operator console trait
pub trait Console {
    /// Take the next complete line, if one has arrived (non-blocking)
    fn poll_line(&mut self) -> Option<CommandLine>;

    /// Report one line of human-readable output
    fn write_line(&mut self, line: &str) -> impl core::future::Future<Output = ()>;
}
