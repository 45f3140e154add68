//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests and in the desktop simulator.
//! Every mock records the calls it receives so tests can assert on exact
//! command sequences.

use crate::*;

/// Error produced by the mocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// Simulated bus / transceiver failure
    #[error("simulated I/O failure")]
    Io,
    /// Page access with no tag in the field
    #[error("no tag in the field")]
    NoTarget,
    /// Page access outside the simulated tag memory
    #[error("page outside tag memory")]
    BadPage,
    /// The audio command log is full; call `clear()` between phases
    #[error("mock command log full")]
    LogFull,
}

/// Pages simulated per tag (NTAG213 user area starts at page 4)
pub const MOCK_TAG_PAGES: usize = 16;

#[derive(Clone, Copy)]
struct MockTag {
    uid: TagUid,
    pages: [Page; MOCK_TAG_PAGES],
}

/// Mock NFC reader with a simulated field holding at most one tag
pub struct MockTagReader {
    tags: heapless::Vec<MockTag, 8>,
    in_field: Option<usize>,
    missed_polls: u32,
    failing_polls: u32,
    fail_init: bool,
    fail_reads: bool,
    fail_writes: bool,
    poll_count: u32,
    read_count: u32,
    write_count: u32,
}

impl MockTagReader {
    /// Create a reader with an empty field and no known tags
    pub fn new() -> Self {
        Self {
            tags: heapless::Vec::new(),
            in_field: None,
            missed_polls: 0,
            failing_polls: 0,
            fail_init: false,
            fail_reads: false,
            fail_writes: false,
            poll_count: 0,
            read_count: 0,
            write_count: 0,
        }
    }

    /// Register a tag whose memory is blank except for page 4.
    ///
    /// Re-registering a known UID replaces its page 4.
    pub fn add_tag(&mut self, uid: &[u8], page4: Page) -> Result<(), MockError> {
        let uid = TagUid::from_slice(uid).map_err(|_| MockError::Io)?;
        let mut pages = [[0u8; PAGE_SIZE]; MOCK_TAG_PAGES];
        if let Some(slot) = pages.get_mut(4) {
            *slot = page4;
        }
        if let Some(existing) = self.tags.iter_mut().find(|t| t.uid == uid) {
            existing.pages = pages;
            return Ok(());
        }
        self.tags
            .push(MockTag { uid, pages })
            .map_err(|_| MockError::Io)
    }

    /// Move a registered tag into the field
    pub fn place(&mut self, uid: &[u8]) {
        self.in_field = self
            .tags
            .iter()
            .position(|t| t.uid.as_bytes() == uid);
    }

    /// Empty the field
    pub fn remove(&mut self) {
        self.in_field = None;
    }

    /// Make the next `n` polls report `NoTag` even with a tag in the field
    pub fn miss_next_polls(&mut self, n: u32) {
        self.missed_polls = n;
    }

    /// Make the next `n` polls fail with [`MockError::Io`]
    pub fn fail_next_polls(&mut self, n: u32) {
        self.failing_polls = n;
    }

    /// Make [`TagReader::init`] fail
    pub fn set_fail_init(&mut self, fail: bool) {
        self.fail_init = fail;
    }

    /// Make every page read fail
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every page write fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Page contents of a registered tag
    pub fn page_of(&self, uid: &[u8], page: u8) -> Option<Page> {
        self.tags
            .iter()
            .find(|t| t.uid.as_bytes() == uid)
            .and_then(|t| t.pages.get(usize::from(page)).copied())
    }

    /// Number of `poll_tag` calls so far
    pub fn poll_count(&self) -> u32 {
        self.poll_count
    }

    /// Number of `read_page` calls so far
    pub fn read_count(&self) -> u32 {
        self.read_count
    }

    /// Number of `write_page` calls so far
    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    fn tag_in_field(&mut self) -> Result<&mut MockTag, MockError> {
        let index = self.in_field.ok_or(MockError::NoTarget)?;
        self.tags.get_mut(index).ok_or(MockError::NoTarget)
    }
}

impl Default for MockTagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for MockTagReader {
    type Error = MockError;

    async fn init(&mut self) -> Result<ReaderInfo, Self::Error> {
        if self.fail_init {
            return Err(MockError::Io);
        }
        Ok(ReaderInfo {
            ic: 0x32,
            version: 1,
            revision: 6,
        })
    }

    async fn poll_tag(&mut self, _timeout_ms: u32) -> Result<TagReadResult, Self::Error> {
        self.poll_count = self.poll_count.saturating_add(1);
        if self.failing_polls > 0 {
            self.failing_polls = self.failing_polls.saturating_sub(1);
            return Err(MockError::Io);
        }
        if self.missed_polls > 0 {
            self.missed_polls = self.missed_polls.saturating_sub(1);
            return Ok(TagReadResult::NoTag);
        }
        Ok(match self.tag_in_field() {
            Ok(tag) => TagReadResult::Present(tag.uid),
            Err(_) => TagReadResult::NoTag,
        })
    }

    async fn read_page(&mut self, page: u8) -> Result<Page, Self::Error> {
        self.read_count = self.read_count.saturating_add(1);
        if self.fail_reads {
            return Err(MockError::Io);
        }
        let tag = self.tag_in_field()?;
        tag.pages
            .get(usize::from(page))
            .copied()
            .ok_or(MockError::BadPage)
    }

    async fn write_page(&mut self, page: u8, data: Page) -> Result<(), Self::Error> {
        self.write_count = self.write_count.saturating_add(1);
        if self.fail_writes {
            return Err(MockError::Io);
        }
        let tag = self.tag_in_field()?;
        let slot = tag
            .pages
            .get_mut(usize::from(page))
            .ok_or(MockError::BadPage)?;
        *slot = data;
        Ok(())
    }
}

/// A command received by [`MockAudioPlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    /// `play_track(n)`
    Play(u16),
    /// `stop()`
    Stop,
    /// `set_volume(level)`
    Volume(u8),
}

/// Commands a [`MockAudioPlayer`] records before it refuses more.
pub const MOCK_AUDIO_LOG_LEN: usize = 128;

/// Mock audio player that records every command in order
///
/// A full log is a test bug: debug builds panic, release builds report
/// [`MockError::LogFull`] from the command.
pub struct MockAudioPlayer {
    log: heapless::Vec<AudioCommand, MOCK_AUDIO_LOG_LEN>,
    volume: VolumeLevel,
    fail_init: bool,
    fail_commands: bool,
}

impl MockAudioPlayer {
    /// Create a new mock audio player
    pub fn new() -> Self {
        Self {
            log: heapless::Vec::new(),
            volume: VolumeLevel::DEFAULT,
            fail_init: false,
            fail_commands: false,
        }
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> &[AudioCommand] {
        &self.log
    }

    /// Number of `stop()` calls received
    pub fn stop_count(&self) -> usize {
        self.log.iter().filter(|c| **c == AudioCommand::Stop).count()
    }

    /// Number of `play_track()` calls received
    pub fn play_count(&self) -> usize {
        self.log
            .iter()
            .filter(|c| matches!(c, AudioCommand::Play(_)))
            .count()
    }

    /// Number of `set_volume()` calls received
    pub fn volume_count(&self) -> usize {
        self.log
            .iter()
            .filter(|c| matches!(c, AudioCommand::Volume(_)))
            .count()
    }

    /// Last volume applied
    pub fn volume(&self) -> VolumeLevel {
        self.volume
    }

    /// Forget recorded commands
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Make [`AudioPlayer::init`] fail
    pub fn set_fail_init(&mut self, fail: bool) {
        self.fail_init = fail;
    }

    /// Make every command report an error (it is still recorded)
    pub fn set_fail_commands(&mut self, fail: bool) {
        self.fail_commands = fail;
    }

    fn record(&mut self, command: AudioCommand) -> Result<(), MockError> {
        debug_assert!(
            !self.log.is_full(),
            "mock command log full after {MOCK_AUDIO_LOG_LEN} commands"
        );
        self.log.push(command).map_err(|_| MockError::LogFull)?;
        if self.fail_commands {
            Err(MockError::Io)
        } else {
            Ok(())
        }
    }
}

impl Default for MockAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for MockAudioPlayer {
    type Error = MockError;

    async fn init(&mut self, volume: VolumeLevel) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(MockError::Io);
        }
        self.volume = volume;
        Ok(())
    }

    async fn play_track(&mut self, track: TrackIndex) -> Result<(), Self::Error> {
        self.record(AudioCommand::Play(track.get()))
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.record(AudioCommand::Stop)
    }

    async fn set_volume(&mut self, volume: VolumeLevel) -> Result<(), Self::Error> {
        self.volume = volume;
        self.record(AudioCommand::Volume(volume.get()))
    }
}

/// Mock GPIO pin, usable as either an input or an output
pub struct MockPin {
    high: bool,
    writes: usize,
}

impl MockPin {
    /// Create a pin at the given level
    pub fn new(high: bool) -> Self {
        Self { high, writes: 0 }
    }

    /// Drive the simulated input level
    pub fn set_level(&mut self, high: bool) {
        self.high = high;
    }

    /// Current level
    pub fn level(&self) -> PinState {
        PinState::from(self.high)
    }

    /// Number of output writes received
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl InputPin for MockPin {
    type Error = core::convert::Infallible;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }
}

impl OutputPin for MockPin {
    type Error = core::convert::Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

/// Longest output line kept by [`MockConsole`]
pub const MOCK_OUTPUT_LEN: usize = 80;

/// Mock console with queued input lines and recorded output lines
pub struct MockConsole {
    input: heapless::Deque<CommandLine, 8>,
    output: heapless::Vec<heapless::String<MOCK_OUTPUT_LEN>, 64>,
}

impl MockConsole {
    /// Create a console with no pending input
    pub fn new() -> Self {
        Self {
            input: heapless::Deque::new(),
            output: heapless::Vec::new(),
        }
    }

    /// Queue one operator line (truncated to [`MAX_LINE_LEN`])
    pub fn push_line(&mut self, line: &str) -> Result<(), MockError> {
        let mut buf = CommandLine::new();
        for ch in line.chars() {
            if buf.push(ch).is_err() {
                break;
            }
        }
        self.input.push_back(buf).map_err(|_| MockError::Io)
    }

    /// Every line written so far
    pub fn output(&self) -> impl Iterator<Item = &str> {
        self.output.iter().map(heapless::String::as_str)
    }

    /// `true` if any written line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.output().any(|line| line.contains(needle))
    }

    /// Forget recorded output
    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

impl Default for MockConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for MockConsole {
    fn poll_line(&mut self) -> Option<CommandLine> {
        self.input.pop_front()
    }

    async fn write_line(&mut self, line: &str) {
        let mut buf = heapless::String::new();
        for ch in line.chars() {
            if buf.push(ch).is_err() {
                break;
            }
        }
        let _ = self.output.push(buf);
    }
}
