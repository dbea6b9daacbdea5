/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The length header is not a space-padded decimal integer.
    #[error("malformed length header {raw:?}")]
    BadHeader { raw: String },

    /// The decimal form of the payload length does not fit the header width.
    #[error("payload length {len} does not fit in a {width}-byte header")]
    HeaderOverflow { len: usize, width: usize },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended mid-frame: fewer bytes arrived than declared.
    #[error("truncated frame ({read} of {expected} bytes)")]
    Truncated { expected: usize, read: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection at a frame boundary.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
