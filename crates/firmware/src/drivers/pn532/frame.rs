//! PN532 host-interface frame codec (normal information frames).
//!
//! ```text
//! 00 00 FF | LEN | LCS | TFI | CMD | data… | DCS | 00
//! ```
//!
//! `LEN` counts `TFI`, `CMD` and the data bytes. `LEN + LCS` and
//! `TFI + CMD + data + DCS` are both 0 modulo 256. `TFI` is `0xD4` towards the
//! PN532 and `0xD5` back to the host, and a response carries `CMD + 1`.

/// Frame identifier, host to PN532.
pub const TFI_HOST: u8 = 0xD4;
/// Frame identifier, PN532 to host.
pub const TFI_PN532: u8 = 0xD5;
/// ACK frame. Also sent by the host to abort the pending command.
pub const ACK: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];

const PREAMBLE: [u8; 3] = [0x00, 0x00, 0xFF];
const POSTAMBLE: u8 = 0x00;

/// Longest command payload this driver sends (`InDataExchange` WRITE).
pub const MAX_COMMAND_DATA: usize = 8;
/// Encoded size of the longest command frame.
pub const MAX_COMMAND_FRAME: usize = 9 + MAX_COMMAND_DATA;

/// Bytes clocked in for every response read, status byte included.
pub const RESPONSE_READ_LEN: usize = 32;
/// Largest response body that fits in [`RESPONSE_READ_LEN`].
pub const MAX_RESPONSE_BODY: usize = RESPONSE_READ_LEN - 10;

/// Encoded command frame.
pub type CommandFrame = heapless::Vec<u8, MAX_COMMAND_FRAME>;
/// Response payload following `TFI` and `CMD + 1`.
pub type ResponseBody = heapless::Vec<u8, MAX_RESPONSE_BODY>;

/// Malformed or unexpected frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command payload longer than [`MAX_COMMAND_DATA`].
    #[error("command payload too long")]
    TooLong,
    /// Missing `00 00 FF` start sequence.
    #[error("bad preamble")]
    Preamble,
    /// `LEN + LCS != 0` or `LEN` past the end of the buffer.
    #[error("bad length")]
    Length,
    /// `TFI + CMD + data + DCS != 0`.
    #[error("bad data checksum")]
    Checksum,
    /// PN532 application-level error frame.
    #[error("PN532 reported a syntax error")]
    SyntaxError,
    /// Response to some other command (payload: response code seen).
    #[error("unexpected response code {0:#04x}")]
    UnexpectedResponse(u8),
}

/// Encode `cmd` with its `data` into a host-to-PN532 frame.
pub fn encode_command(cmd: u8, data: &[u8]) -> Result<CommandFrame, FrameError> {
    if data.len() > MAX_COMMAND_DATA {
        return Err(FrameError::TooLong);
    }
    // Bounded by the check above, the cast cannot truncate.
    let len = (data.len() as u8).wrapping_add(2);
    let sum = data
        .iter()
        .fold(TFI_HOST.wrapping_add(cmd), |acc, &b| acc.wrapping_add(b));

    let mut frame = CommandFrame::new();
    let mut put = |bytes: &[u8]| frame.extend_from_slice(bytes).map_err(|_| FrameError::TooLong);
    put(&PREAMBLE)?;
    put(&[len, len.wrapping_neg(), TFI_HOST, cmd])?;
    put(data)?;
    put(&[sum.wrapping_neg(), POSTAMBLE])?;
    Ok(frame)
}

/// Validate a response frame to `cmd` and return its payload.
///
/// `raw` starts at the preamble; the I²C status byte must already be
/// stripped. Trailing bytes after the postamble are ignored.
pub fn decode_response(cmd: u8, raw: &[u8]) -> Result<ResponseBody, FrameError> {
    if raw.get(..3) != Some(&PREAMBLE[..]) {
        return Err(FrameError::Preamble);
    }
    let (len, lcs) = match (raw.get(3), raw.get(4)) {
        (Some(&len), Some(&lcs)) => (len, lcs),
        _ => return Err(FrameError::Length),
    };
    if len.wrapping_add(lcs) != 0 {
        return Err(FrameError::Length);
    }
    let len = usize::from(len);
    let end = len.checked_add(5).ok_or(FrameError::Length)?;
    let payload = raw.get(5..end).ok_or(FrameError::Length)?;
    let dcs = *raw.get(end).ok_or(FrameError::Length)?;

    let sum = payload.iter().fold(dcs, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        return Err(FrameError::Checksum);
    }

    match payload {
        [TFI_PN532, code, body @ ..] => {
            if *code != cmd.wrapping_add(1) {
                return Err(FrameError::UnexpectedResponse(*code));
            }
            ResponseBody::from_slice(body).map_err(|_| FrameError::Length)
        }
        [0x7F] => Err(FrameError::SyntaxError),
        _ => Err(FrameError::Preamble),
    }
}
