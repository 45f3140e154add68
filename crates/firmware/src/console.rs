//! Serial console plumbing.
//!
//! [`LineAssembler`] turns the raw byte stream from the console UART into
//! complete lines. On hardware a reader task feeds it and forwards lines
//! through a channel to [`SerialConsole`], which the controller polls without
//! blocking.

use platform::{CommandLine, MAX_LINE_LEN};

/// Byte-to-line assembler.
///
/// `\n` ends a line and `\r` is dropped, so both `\n` and `\r\n` endings
/// work. A line longer than [`MAX_LINE_LEN`] bytes is discarded whole, as is
/// one that is not valid UTF-8.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineAssembler {
    /// Empty assembler.
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte; returns the trimmed line when `byte` completes one.
    pub fn push(&mut self, byte: u8) -> Option<CommandLine> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let line = self.take_line();
                self.buf.clear();
                self.overflowed = false;
                line
            }
            _ => {
                if self.buf.push(byte).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Feed a chunk, handing every completed line to `on_line`.
    pub fn feed(&mut self, bytes: &[u8], mut on_line: impl FnMut(CommandLine)) {
        for &byte in bytes {
            if let Some(line) = self.push(byte) {
                on_line(line);
            }
        }
    }

    fn take_line(&self) -> Option<CommandLine> {
        if self.overflowed {
            return None;
        }
        let text = core::str::from_utf8(&self.buf).ok()?;
        let mut line = CommandLine::new();
        line.push_str(text.trim()).ok()?;
        Some(line)
    }
}

#[cfg(feature = "hardware")]
pub use serial::{SerialConsole, LINE_QUEUE_DEPTH};

#[cfg(feature = "hardware")]
mod serial {
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::channel::Receiver;
    use embedded_io_async::Write;
    use platform::{CommandLine, Console};

    /// Lines buffered between the UART reader task and the controller.
    pub const LINE_QUEUE_DEPTH: usize = 4;

    /// [`Console`] over a UART transmitter and a queue of received lines.
    pub struct SerialConsole<W: Write + 'static> {
        tx: W,
        lines: Receiver<'static, CriticalSectionRawMutex, CommandLine, LINE_QUEUE_DEPTH>,
    }

    impl<W: Write + 'static> SerialConsole<W> {
        /// Console writing to `tx` and reading from `lines`.
        pub fn new(
            tx: W,
            lines: Receiver<'static, CriticalSectionRawMutex, CommandLine, LINE_QUEUE_DEPTH>,
        ) -> Self {
            Self { tx, lines }
        }
    }

    impl<W: Write + 'static> Console for SerialConsole<W> {
        fn poll_line(&mut self) -> Option<CommandLine> {
            self.lines.try_receive().ok()
        }

        async fn write_line(&mut self, line: &str) {
            // Console output is best effort.
            let _ = self.tx.write_all(line.as_bytes()).await;
            let _ = self.tx.write_all(b"\r\n").await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn collect(bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut asm = LineAssembler::new();
        asm.feed(bytes, |line| lines.push(line.as_str().to_owned()));
        lines
    }

    #[test]
    fn test_lf_and_crlf_endings() {
        assert_eq!(collect(b"read\nwrite 5\r\n"), vec!["read", "write 5"]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(collect(b"  playmode \t\n"), vec!["playmode"]);
    }

    #[test]
    fn test_blank_line_yields_empty() {
        assert_eq!(collect(b"\r\n"), vec![""]);
    }

    #[test]
    fn test_partial_line_waits_for_terminator() {
        let mut asm = LineAssembler::new();
        assert!(asm.push(b'r').is_none());
        assert!(asm.push(b'e').is_none());
        asm.feed(b"ad", |_| panic!("no line yet"));
        assert_eq!(asm.push(b'\n').unwrap().as_str(), "read");
    }

    #[test]
    fn test_overlong_line_discarded_and_next_line_kept() {
        let mut input = vec![b'x'; MAX_LINE_LEN + 5];
        input.extend_from_slice(b"\nread\n");
        assert_eq!(collect(&input), vec!["read"]);
    }

    #[test]
    fn test_exactly_max_len_kept() {
        let mut input = vec![b'a'; MAX_LINE_LEN];
        input.push(b'\n');
        assert_eq!(collect(&input)[0].len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_invalid_utf8_discarded() {
        assert_eq!(collect(b"\xff\xfe\nread\n"), vec!["read"]);
    }
}
