//! Operator command parsing.
//!
//! | Input          | Command                          |
//! |----------------|----------------------------------|
//! | `write <n>`    | program a tag with song `n`      |
//! | `read`         | report the song on a tag         |
//! | `playmode`     | return to normal playback        |
//! | blank line     | ignored                          |
//! | anything else  | print usage                      |
//!
//! The song argument is read like C `atoi`: leading whitespace, an optional
//! sign, then as many digits as follow. `write 7abc` is song 7 and
//! `write abc` is song 0, which is out of range.

use tags::SongNumber;

/// Usage text printed for unrecognised input.
pub const USAGE: [&str; 4] = [
    "Commands:",
    "  write <num> - program tag",
    "  read        - read tag",
    "  playmode    - normal playback",
];

/// One parsed operator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Program the next presented tag.
    Write(SongNumber),
    /// Read the next presented tag.
    Read,
    /// Force play mode.
    PlayMode,
    /// `write` with a number outside 1–99.
    InvalidSong(i32),
    /// Non-empty input that is not a command.
    Unknown,
    /// Blank line.
    Empty,
}

/// Parse one line. Surrounding whitespace is ignored.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Some(arg) = line.strip_prefix("write ") {
        let n = leading_int(arg);
        return match SongNumber::new(n) {
            Ok(song) => Command::Write(song),
            Err(_) => Command::InvalidSong(n),
        };
    }
    match line {
        "read" => Command::Read,
        "playmode" => Command::PlayMode,
        _ => Command::Unknown,
    }
}

/// Leading decimal integer of `s`, 0 if there is none. Saturates on overflow.
fn leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..).unwrap_or("")),
        Some(b'+') => (false, s.get(1..).unwrap_or("")),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| {
            acc.saturating_mul(10)
                .saturating_add(i32::from(d.wrapping_sub(b'0')))
        });
    if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn song(n: i32) -> SongNumber {
        SongNumber::new(n).unwrap()
    }

    #[test]
    fn test_write_with_valid_number() {
        assert_eq!(parse("write 7"), Command::Write(song(7)));
        assert_eq!(parse("  write 99\r"), Command::Write(song(99)));
        assert_eq!(parse("write   12"), Command::Write(song(12)));
    }

    #[test]
    fn test_write_out_of_range() {
        assert_eq!(parse("write 0"), Command::InvalidSong(0));
        assert_eq!(parse("write 100"), Command::InvalidSong(100));
        assert_eq!(parse("write -5"), Command::InvalidSong(-5));
    }

    #[test]
    fn test_write_non_numeric_is_zero() {
        assert_eq!(parse("write abc"), Command::InvalidSong(0));
    }

    #[test]
    fn test_write_trailing_garbage_ignored() {
        assert_eq!(parse("write 7abc"), Command::Write(song(7)));
    }

    #[test]
    fn test_write_huge_number_saturates() {
        assert_eq!(
            parse("write 99999999999999"),
            Command::InvalidSong(i32::MAX)
        );
    }

    #[test]
    fn test_bare_write_is_unknown() {
        assert_eq!(parse("write"), Command::Unknown);
        assert_eq!(parse("write "), Command::Unknown);
    }

    #[test]
    fn test_read_and_playmode() {
        assert_eq!(parse("read"), Command::Read);
        assert_eq!(parse("playmode\r\n"), Command::PlayMode);
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(parse("READ"), Command::Unknown);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("   \t"), Command::Empty);
    }
}
