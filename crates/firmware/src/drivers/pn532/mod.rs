//! PN532 NFC transceiver over I²C.
//!
//! Every command is a three-step exchange:
//!
//! 1. write the command frame,
//! 2. poll the status byte until the chip is ready, then read the ACK frame,
//! 3. poll again and read the response frame.
//!
//! Each I²C read returns the status byte first, so the ACK is read as 7 bytes
//! and responses as a fixed [`frame::RESPONSE_READ_LEN`].
//!
//! Only NTAG2xx page access is implemented: `READ` (0x30) returns four pages,
//! of which the first is kept, and `WRITE` (0xA2) stores one page.

pub mod frame;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use platform::{Page, ReaderInfo, TagReadResult, TagReader, TagUid, PAGE_SIZE};

use frame::{FrameError, ResponseBody, ACK, RESPONSE_READ_LEN};

/// Default 7-bit I²C address.
pub const I2C_ADDRESS: u8 = crate::config::pins::PN532_I2C_ADDR;

const CMD_GET_FIRMWARE_VERSION: u8 = 0x02;
const CMD_SAM_CONFIGURATION: u8 = 0x14;
const CMD_IN_DATA_EXCHANGE: u8 = 0x40;
const CMD_IN_LIST_PASSIVE_TARGET: u8 = 0x4A;

const NTAG_READ: u8 = 0x30;
const NTAG_WRITE: u8 = 0xA2;

/// Status byte value once a frame is waiting to be read.
const STATUS_READY: u8 = 0x01;

/// Wait for the ACK of any command.
const ACK_TIMEOUT_MS: u32 = 50;
/// Wait for the response of a non-polling command.
const RESPONSE_TIMEOUT_MS: u32 = 1_000;

/// Logical target number assigned by `InListPassiveTarget`.
const TARGET: u8 = 0x01;

/// PN532 driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Pn532Error<E> {
    /// I²C transfer failed.
    #[error("I2C bus error: {0:?}")]
    Bus(E),
    /// The chip did not become ready in time.
    #[error("PN532 not ready in time")]
    Timeout,
    /// Something other than an ACK frame came back.
    #[error("command not acknowledged")]
    Nack,
    /// Malformed or unexpected response frame.
    #[error("bad frame: {0}")]
    Frame(FrameError),
    /// Non-zero `InDataExchange` status (tag did not answer or refused).
    #[error("tag exchange failed with status {0:#04x}")]
    Status(u8),
    /// Target reported a UID longer than 7 bytes.
    #[error("target UID too long")]
    UidTooLong,
}

impl<E> From<FrameError> for Pn532Error<E> {
    fn from(err: FrameError) -> Self {
        Self::Frame(err)
    }
}

/// PN532 driver on an async I²C bus.
pub struct Pn532<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Pn532<I, D> {
    /// Driver for a PN532 at [`I2C_ADDRESS`].
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: I2C_ADDRESS,
        }
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Send a command and wait for its ACK.
    async fn send_command(&mut self, cmd: u8, data: &[u8]) -> Result<(), Pn532Error<I::Error>> {
        let frame = frame::encode_command(cmd, data)?;
        self.i2c
            .write(self.address, &frame)
            .await
            .map_err(Pn532Error::Bus)?;

        self.wait_ready(ACK_TIMEOUT_MS).await?;
        let mut ack = [0u8; 1 + ACK.len()];
        self.i2c
            .read(self.address, &mut ack)
            .await
            .map_err(Pn532Error::Bus)?;
        if ack.get(1..) == Some(&ACK[..]) {
            Ok(())
        } else {
            Err(Pn532Error::Nack)
        }
    }

    /// Poll the status byte every millisecond for up to `timeout_ms`.
    async fn wait_ready(&mut self, timeout_ms: u32) -> Result<(), Pn532Error<I::Error>> {
        let mut waited = 0u32;
        loop {
            let mut status = [0u8; 1];
            self.i2c
                .read(self.address, &mut status)
                .await
                .map_err(Pn532Error::Bus)?;
            if status == [STATUS_READY] {
                return Ok(());
            }
            if waited >= timeout_ms {
                return Err(Pn532Error::Timeout);
            }
            self.delay.delay_ms(1).await;
            waited = waited.saturating_add(1);
        }
    }

    /// Wait for and decode the response to `cmd`.
    async fn read_response(
        &mut self,
        cmd: u8,
        timeout_ms: u32,
    ) -> Result<ResponseBody, Pn532Error<I::Error>> {
        self.wait_ready(timeout_ms).await?;
        let mut raw = [0u8; RESPONSE_READ_LEN];
        self.i2c
            .read(self.address, &mut raw)
            .await
            .map_err(Pn532Error::Bus)?;
        Ok(frame::decode_response(cmd, raw.get(1..).unwrap_or(&[]))?)
    }

    async fn command(
        &mut self,
        cmd: u8,
        data: &[u8],
    ) -> Result<ResponseBody, Pn532Error<I::Error>> {
        self.send_command(cmd, data).await?;
        self.read_response(cmd, RESPONSE_TIMEOUT_MS).await
    }

    /// Cancel the pending command.
    async fn abort(&mut self) -> Result<(), Pn532Error<I::Error>> {
        self.i2c
            .write(self.address, &ACK)
            .await
            .map_err(Pn532Error::Bus)
    }

    /// `InDataExchange` with target 1, checking the status byte.
    async fn exchange(&mut self, data: &[u8]) -> Result<ResponseBody, Pn532Error<I::Error>> {
        let mut request = heapless::Vec::<u8, { frame::MAX_COMMAND_DATA }>::new();
        request.push(TARGET).map_err(|_| FrameError::TooLong)?;
        request
            .extend_from_slice(data)
            .map_err(|_| FrameError::TooLong)?;

        let body = self.command(CMD_IN_DATA_EXCHANGE, &request).await?;
        match body.first() {
            Some(0) => Ok(body),
            Some(&status) => Err(Pn532Error::Status(status)),
            None => Err(FrameError::Length.into()),
        }
    }
}

/// Pull the first target's UID out of an `InListPassiveTarget` response.
///
/// Layout: `NbTg, Tg, SENS_RES (2), SEL_RES, UIDLength, UID…`.
fn parse_target<E>(body: &[u8]) -> Result<TagReadResult, Pn532Error<E>> {
    match body {
        [] | [0, ..] => Ok(TagReadResult::NoTag),
        [_, _, _, _, _, uid_len, rest @ ..] => {
            let uid = rest
                .get(..usize::from(*uid_len))
                .ok_or(Pn532Error::Frame(FrameError::Length))?;
            TagUid::from_slice(uid)
                .map(TagReadResult::Present)
                .map_err(|_| Pn532Error::UidTooLong)
        }
        _ => Err(Pn532Error::Frame(FrameError::Length)),
    }
}

impl<I: I2c, D: DelayNs> TagReader for Pn532<I, D> {
    type Error = Pn532Error<I::Error>;

    async fn init(&mut self) -> Result<ReaderInfo, Self::Error> {
        let version = self.command(CMD_GET_FIRMWARE_VERSION, &[]).await?;
        let info = match version.as_slice() {
            [ic, ver, rev, ..] => ReaderInfo {
                ic: *ic,
                version: *ver,
                revision: *rev,
            },
            _ => return Err(FrameError::Length.into()),
        };

        // Normal mode, 1 s virtual-card timeout, IRQ pin in use.
        self.command(CMD_SAM_CONFIGURATION, &[0x01, 0x14, 0x01])
            .await?;
        Ok(info)
    }

    async fn poll_tag(&mut self, timeout_ms: u32) -> Result<TagReadResult, Self::Error> {
        // Max one target, 106 kbps type A.
        self.send_command(CMD_IN_LIST_PASSIVE_TARGET, &[0x01, 0x00])
            .await?;
        match self.read_response(CMD_IN_LIST_PASSIVE_TARGET, timeout_ms).await {
            Ok(body) => parse_target(&body),
            Err(Pn532Error::Timeout) => {
                self.abort().await?;
                Ok(TagReadResult::NoTag)
            }
            Err(e) => Err(e),
        }
    }

    async fn read_page(&mut self, page: u8) -> Result<Page, Self::Error> {
        let body = self.exchange(&[NTAG_READ, page]).await?;
        body.get(1..=PAGE_SIZE)
            .and_then(|bytes| Page::try_from(bytes).ok())
            .ok_or(Pn532Error::Frame(FrameError::Length))
    }

    async fn write_page(&mut self, page: u8, data: Page) -> Result<(), Self::Error> {
        let [d0, d1, d2, d3] = data;
        self.exchange(&[NTAG_WRITE, page, d0, d1, d2, d3]).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_target() {
        assert_eq!(parse_target::<()>(&[0x00]), Ok(TagReadResult::NoTag));
    }

    #[test]
    fn test_parse_four_byte_uid() {
        let body = [0x01, 0x01, 0x00, 0x04, 0x08, 0x04, 0xDE, 0xAD, 0xBE, 0xEF];
        let expected = TagUid::from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(
            parse_target::<()>(&body),
            Ok(TagReadResult::Present(expected))
        );
    }

    #[test]
    fn test_parse_truncated_uid() {
        let body = [0x01, 0x01, 0x00, 0x44, 0x00, 0x07, 0x04, 0x11];
        assert_eq!(
            parse_target::<()>(&body),
            Err(Pn532Error::Frame(FrameError::Length))
        );
    }

    #[test]
    fn test_parse_overlong_uid() {
        let mut body = vec![0x01, 0x01, 0x00, 0x44, 0x00, 0x0A];
        body.extend_from_slice(&[0xAA; 10]);
        assert_eq!(parse_target::<()>(&body), Err(Pn532Error::UidTooLong));
    }
}
