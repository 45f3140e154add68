//! DFPlayer Mini MP3 module over UART (9600 8N1, transmit only).
//!
//! Every command is one 10-byte frame:
//!
//! ```text
//! 7E FF 06 CMD 00 P_hi P_lo CK_hi CK_lo EF
//! ```
//!
//! The feedback byte is always 0; the module's replies are never read. The
//! checksum is the two's complement of the 16-bit sum of bytes 1 to 6.

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;
use platform::{AudioPlayer, TrackIndex, VolumeLevel};

const START: u8 = 0x7E;
const VERSION: u8 = 0xFF;
const LENGTH: u8 = 0x06;
const NO_FEEDBACK: u8 = 0x00;
const END: u8 = 0xEF;

/// Encoded command frame length.
pub const FRAME_LEN: usize = 10;

/// Module start-up time after a reset.
pub const RESET_SETTLE_MS: u32 = 1_000;
/// Pause after selecting the output device.
pub const DEVICE_SETTLE_MS: u32 = 200;

/// DFPlayer command codes used by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Play track `P` from the root of the card.
    PlayTrack = 0x03,
    /// Set volume to `P` (0–30).
    Volume = 0x06,
    /// Select equaliser preset `P`.
    Equalizer = 0x07,
    /// Select playback device `P`.
    OutputDevice = 0x09,
    /// Soft reset.
    Reset = 0x0C,
    /// Stop playback.
    Stop = 0x16,
}

/// Equaliser preset "normal".
pub const EQ_NORMAL: u16 = 0;
/// Output device "SD card".
pub const DEVICE_SD: u16 = 2;

/// DFPlayer driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DfPlayerError<E> {
    /// UART write failed.
    #[error("UART write failed: {0:?}")]
    Write(E),
}

/// Encode one command frame.
pub fn encode(cmd: Command, param: u16) -> [u8; FRAME_LEN] {
    let [p_hi, p_lo] = param.to_be_bytes();
    let body = [VERSION, LENGTH, cmd as u8, NO_FEEDBACK, p_hi, p_lo];
    let sum = body
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    let [ck_hi, ck_lo] = sum.wrapping_neg().to_be_bytes();
    [
        START, VERSION, LENGTH, cmd as u8, NO_FEEDBACK, p_hi, p_lo, ck_hi, ck_lo, END,
    ]
}

/// DFPlayer Mini on a UART transmitter.
pub struct DfPlayer<W, D> {
    uart: W,
    delay: D,
}

impl<W: Write, D: DelayNs> DfPlayer<W, D> {
    /// Driver writing to `uart`.
    pub fn new(uart: W, delay: D) -> Self {
        Self { uart, delay }
    }

    /// Give the UART and delay back.
    pub fn release(self) -> (W, D) {
        (self.uart, self.delay)
    }

    /// Send one command and flush it out.
    pub async fn send(&mut self, cmd: Command, param: u16) -> Result<(), DfPlayerError<W::Error>> {
        let frame = encode(cmd, param);
        self.uart
            .write_all(&frame)
            .await
            .map_err(DfPlayerError::Write)?;
        self.uart.flush().await.map_err(DfPlayerError::Write)
    }
}

impl<W: Write, D: DelayNs> AudioPlayer for DfPlayer<W, D> {
    type Error = DfPlayerError<W::Error>;

    async fn init(&mut self, volume: VolumeLevel) -> Result<(), Self::Error> {
        self.send(Command::Reset, 0).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        self.send(Command::Volume, u16::from(volume.get())).await?;
        self.send(Command::Equalizer, EQ_NORMAL).await?;
        self.send(Command::OutputDevice, DEVICE_SD).await?;
        self.delay.delay_ms(DEVICE_SETTLE_MS).await;
        Ok(())
    }

    async fn play_track(&mut self, track: TrackIndex) -> Result<(), Self::Error> {
        self.send(Command::PlayTrack, track.get()).await
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.send(Command::Stop, 0).await
    }

    async fn set_volume(&mut self, volume: VolumeLevel) -> Result<(), Self::Error> {
        self.send(Command::Volume, u16::from(volume.get())).await
    }
}
