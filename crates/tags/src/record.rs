//! Song record codec.
//!
//! A programmed tag carries one 4-byte record in NTAG page 4:
//!
//! | Byte | Content                      |
//! |------|------------------------------|
//! | 0..3 | magic `b"SON"`               |
//! | 3    | song number, 1–99            |
//!
//! Anything else on page 4 (blank tags, NDEF-formatted tags, other
//! applications' data) decodes to a [`TagDataError`].

use platform::{OutOfRangeError, Page, TrackIndex};

/// Page holding the song record.
pub const SONG_RECORD_PAGE: u8 = 4;

/// Marker in the first three bytes of a valid record.
pub const SONG_MAGIC: [u8; 3] = *b"SON";

/// Why a tag did not yield a song number
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagDataError {
    /// The record page could not be read from the tag.
    #[error("failed to read tag data")]
    ReadFailed,
    /// The record page does not start with the magic marker.
    #[error("tag not programmed")]
    NotProgrammed,
    /// The magic matched but the song number is outside 1–99.
    #[error("song number {0} out of range")]
    SongOutOfRange(u8),
}

/// A song number in 1–99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SongNumber(u8);

impl SongNumber {
    /// Lowest song number.
    pub const MIN: u8 = 1;
    /// Highest song number.
    pub const MAX: u8 = 99;

    /// Validate a song number.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] outside 1–99.
    pub fn new(n: i32) -> Result<Self, OutOfRangeError> {
        let err = OutOfRangeError {
            value: n,
            min: i32::from(Self::MIN),
            max: i32::from(Self::MAX),
        };
        let byte = u8::try_from(n).map_err(|_| err)?;
        if (Self::MIN..=Self::MAX).contains(&byte) {
            Ok(Self(byte))
        } else {
            Err(err)
        }
    }

    /// The raw number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Audio module track for this song (song *n* is track *n*).
    pub fn track(self) -> TrackIndex {
        // 1–99 always lies inside the track range, so clamping is a no-op.
        TrackIndex::clamped(u16::from(self.0))
    }
}

impl core::fmt::Display for SongNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode the record for `song`.
pub fn encode(song: SongNumber) -> Page {
    let [m0, m1, m2] = SONG_MAGIC;
    [m0, m1, m2, song.get()]
}

/// Decode page 4 contents.
///
/// # Errors
///
/// [`TagDataError::NotProgrammed`] on a magic mismatch,
/// [`TagDataError::SongOutOfRange`] when the number is 0 or above 99.
pub fn decode(page: Page) -> Result<SongNumber, TagDataError> {
    let [m0, m1, m2, song] = page;
    if [m0, m1, m2] != SONG_MAGIC {
        return Err(TagDataError::NotProgrammed);
    }
    SongNumber::new(i32::from(song)).map_err(|_| TagDataError::SongOutOfRange(song))
}
