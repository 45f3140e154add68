//! Song record access on the tag currently in the field.

use platform::log::{self, Dbg};
use platform::TagReader;

use crate::record::{self, SongNumber, TagDataError, SONG_RECORD_PAGE};

/// Anything that can produce the song number of the tag in the field.
///
/// Every [`TagReader`] is a `SongSource`; tests substitute scripted sources.
pub trait SongSource {
    /// Read and validate the song record, once, with no retry.
    fn read_song_number(
        &mut self,
    ) -> impl core::future::Future<Output = Result<SongNumber, TagDataError>>;
}

impl<R: TagReader> SongSource for R {
    async fn read_song_number(&mut self) -> Result<SongNumber, TagDataError> {
        read_song_number(self).await
    }
}

/// Read page 4 of the tag in the field and decode it.
///
/// # Errors
///
/// [`TagDataError::ReadFailed`] when the page read fails, otherwise whatever
/// [`record::decode`] reports.
pub async fn read_song_number<R: TagReader>(reader: &mut R) -> Result<SongNumber, TagDataError> {
    let page = match reader.read_page(SONG_RECORD_PAGE).await {
        Ok(page) => page,
        Err(e) => {
            log::warn!("page {} read failed: {}", SONG_RECORD_PAGE, Dbg(&e));
            return Err(TagDataError::ReadFailed);
        }
    };
    record::decode(page)
}

/// Program the tag in the field with `song`.
///
/// Song numbers are validated when the [`SongNumber`] is built, so an
/// out-of-range number never reaches the transceiver.
///
/// # Errors
///
/// Propagates the reader's write error.
pub async fn write_song_number<R: TagReader>(
    reader: &mut R,
    song: SongNumber,
) -> Result<(), R::Error> {
    reader.write_page(SONG_RECORD_PAGE, record::encode(song)).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MockTagReader;

    const UID: [u8; 7] = [0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6];

    fn reader_with(page4: [u8; 4]) -> MockTagReader {
        let mut reader = MockTagReader::new();
        reader.add_tag(&UID, page4).unwrap();
        reader.place(&UID);
        reader
    }

    #[tokio::test]
    async fn test_write_then_read_song_seven() {
        let mut reader = reader_with([0; 4]);
        write_song_number(&mut reader, SongNumber::new(7).unwrap())
            .await
            .unwrap();
        assert_eq!(reader.page_of(&UID, 4), Some(*b"SON\x07"));
        assert_eq!(read_song_number(&mut reader).await.unwrap().get(), 7);
    }

    #[tokio::test]
    async fn test_blank_tag_not_programmed() {
        let mut reader = reader_with([0; 4]);
        assert_eq!(
            reader.read_song_number().await,
            Err(TagDataError::NotProgrammed)
        );
    }

    #[tokio::test]
    async fn test_read_failure_maps_to_read_failed() {
        let mut reader = reader_with(*b"SON\x05");
        reader.set_fail_reads(true);
        assert_eq!(
            reader.read_song_number().await,
            Err(TagDataError::ReadFailed)
        );
    }

    #[tokio::test]
    async fn test_read_with_empty_field_fails() {
        let mut reader = reader_with(*b"SON\x05");
        reader.remove();
        assert_eq!(
            read_song_number(&mut reader).await,
            Err(TagDataError::ReadFailed)
        );
    }

    #[tokio::test]
    async fn test_write_error_propagates() {
        let mut reader = reader_with([0; 4]);
        reader.set_fail_writes(true);
        assert!(write_song_number(&mut reader, SongNumber::new(1).unwrap())
            .await
            .is_err());
        assert_eq!(reader.page_of(&UID, 4), Some([0; 4]));
    }
}
