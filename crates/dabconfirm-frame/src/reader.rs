use std::io::{ErrorKind, Read};
use std::net::TcpStream;

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_header, FrameConfig};
use crate::error::{FrameError, Result};

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete payloads.
#[derive(Debug)]
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the peer closes at a
    /// frame boundary. A close mid-header or mid-payload is a protocol
    /// error, reported as [`FrameError::Truncated`] instead.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let width = self.config.header_width;
        let mut header = BytesMut::zeroed(width);
        let read = read_full(&mut self.inner, &mut header)?;
        if read == 0 {
            return Err(FrameError::ConnectionClosed);
        }
        if read < width {
            return Err(FrameError::Truncated {
                expected: width,
                read,
            });
        }

        // The header buffer is non-empty here, so decode never yields None.
        let declared = decode_header(&header)?.ok_or(FrameError::ConnectionClosed)?;
        if declared > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: declared,
                max: self.config.max_payload_size,
            });
        }

        let mut payload = BytesMut::zeroed(declared);
        let read = read_full(&mut self.inner, &mut payload)?;
        if read < declared {
            return Err(FrameError::Truncated {
                expected: declared,
                read,
            });
        }
        Ok(payload.freeze())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<TcpStream> {
    /// Create a frame reader for a TCP stream and apply the read timeout
    /// from config.
    pub fn with_config_tcp(inner: TcpStream, config: FrameConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

/// Fill `buf` completely, stopping early only at EOF.
///
/// Returns the number of bytes actually read; `Interrupted` is retried.
fn read_full<T: Read>(inner: &mut T, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(filled)
}
