use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Default header width: 10 ASCII bytes.
pub const DEFAULT_HEADER_WIDTH: usize = 10;

/// Default maximum payload size: 1 MiB.
///
/// Confirmations and acknowledgments are small JSON objects; anything near
/// this limit is a misbehaving peer, not a legitimate message.
pub const DEFAULT_MAX_PAYLOAD: usize = 1024 * 1024;

/// Encode a length header into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────────────┬──────────────────┐
/// │ Header (width bytes)       │ Payload          │
/// │ decimal length, ASCII,     │ (length bytes)   │
/// │ left-justified, space-pad  │                  │
/// └────────────────────────────┴──────────────────┘
/// ```
///
/// For `width` 10 and payload length 42 the header is `b"42        "`.
/// Fails with [`FrameError::HeaderOverflow`] if the decimal representation
/// of `len` does not fit in `width` characters; the length is never
/// silently truncated.
pub fn encode_header(len: usize, width: usize, dst: &mut BytesMut) -> Result<()> {
    let decimal = len.to_string();
    if decimal.len() > width {
        return Err(FrameError::HeaderOverflow { len, width });
    }
    dst.reserve(width);
    dst.put_slice(decimal.as_bytes());
    dst.put_bytes(b' ', width - decimal.len());
    Ok(())
}

/// Decode a length header.
///
/// Returns `Ok(None)` for empty input: zero bytes available means the peer
/// closed the connection, which is "no message" rather than a parse error.
/// Trailing padding spaces are trimmed before parsing; anything left that
/// is not a plain decimal integer is a [`FrameError::BadHeader`].
pub fn decode_header(raw: &[u8]) -> Result<Option<usize>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let text = std::str::from_utf8(raw).map_err(|_| bad_header(raw))?;
    let len = text
        .trim_end_matches(' ')
        .parse::<usize>()
        .map_err(|_| bad_header(raw))?;
    Ok(Some(len))
}

fn bad_header(raw: &[u8]) -> FrameError {
    FrameError::BadHeader {
        raw: String::from_utf8_lossy(raw).into_owned(),
    }
}

/// Encode a complete frame (header + payload) into `dst`.
pub fn encode_frame(payload: &[u8], width: usize, dst: &mut BytesMut) -> Result<()> {
    encode_header(payload.len(), width, dst)?;
    dst.reserve(payload.len());
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Width of the length header in bytes. Both ends must agree.
    pub header_width: usize,
    /// Maximum accepted payload size in bytes. Default: 1 MiB.
    pub max_payload_size: usize,
    /// Read timeout applied to the underlying stream. `None` (the default)
    /// blocks until data arrives or the peer closes.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout applied to the underlying stream.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            header_width: DEFAULT_HEADER_WIDTH,
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
