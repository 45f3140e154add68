//! NFC transceiver abstraction
//!
//! The playback core only needs three capabilities from the reader: a single
//! bounded poll for a passive ISO14443A target, and fixed-size page reads and
//! writes on the target currently in the field (NTAG2xx layout, 4 bytes/page).

use core::fmt;

/// Size of one NTAG2xx memory page in bytes.
pub const PAGE_SIZE: usize = 4;

/// One NTAG2xx memory page.
pub type Page = [u8; PAGE_SIZE];

/// Error returned by [`TagUid::from_slice`] when the input exceeds 7 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("tag UID is {len} bytes, at most {} allowed", TagUid::MAX_LEN)]
pub struct UidTooLong {
    /// Length of the rejected input.
    pub len: usize,
}

/// Hardware-unique identifier of a passive tag (ISO14443A: 4, 7 or, rarely,
/// fewer bytes).
///
/// Two UIDs are equal iff their lengths match and every byte matches; bytes
/// past `len` never take part in comparisons.
#[derive(Clone, Copy)]
pub struct TagUid {
    bytes: [u8; 7],
    len: u8,
}

impl TagUid {
    /// Longest UID an ISO14443A target can report.
    pub const MAX_LEN: usize = 7;

    /// Copy a UID out of a reader response buffer.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, UidTooLong> {
        let too_long = UidTooLong { len: bytes.len() };
        let len = u8::try_from(bytes.len()).map_err(|_| too_long)?;
        let mut uid = Self {
            bytes: [0; 7],
            len,
        };
        uid.bytes
            .get_mut(..bytes.len())
            .ok_or(too_long)?
            .copy_from_slice(bytes);
        Ok(uid)
    }

    /// The valid UID bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.get(..usize::from(self.len)).unwrap_or(&[])
    }

    /// Number of valid bytes (0–7).
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// `true` for a zero-length UID.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for TagUid {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TagUid {}

/// Upper-case, colon-separated hex: `04:A1:B2:C3`.
impl fmt::Display for TagUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TagUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagUid({self})")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TagUid {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:X}", self.as_bytes());
    }
}

/// Outcome of one presence poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagReadResult {
    /// No target answered within the poll timeout.
    NoTag,
    /// A target answered with this UID.
    Present(TagUid),
}

/// Identification reported by the transceiver during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReaderInfo {
    /// IC code (0x32 for a PN532).
    pub ic: u8,
    /// Firmware major version.
    pub version: u8,
    /// Firmware revision.
    pub revision: u8,
}

/// NFC transceiver trait
pub trait TagReader {
    /// Error type
    type Error: core::fmt::Debug;

    /// Bring the transceiver up and report what answered.
    ///
    /// Failure here is fatal for the application.
    fn init(&mut self) -> impl core::future::Future<Output = Result<ReaderInfo, Self::Error>>;

    /// Poll once for a passive target, waiting at most `timeout_ms`.
    ///
    /// A target that does not answer in time is `Ok(NoTag)`, not an error.
    fn poll_tag(
        &mut self,
        timeout_ms: u32,
    ) -> impl core::future::Future<Output = Result<TagReadResult, Self::Error>>;

    /// Read one page from the target selected by the last successful poll.
    fn read_page(
        &mut self,
        page: u8,
    ) -> impl core::future::Future<Output = Result<Page, Self::Error>>;

    /// Write one page on the target selected by the last successful poll.
    fn write_page(
        &mut self,
        page: u8,
        data: Page,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
