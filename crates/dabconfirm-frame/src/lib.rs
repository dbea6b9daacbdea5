//! Length-prefixed message framing for the DAB confirmation protocol.
//!
//! Every message on the wire is framed with a fixed-width header: the
//! payload byte length as a decimal ASCII string, left-justified and
//! right-padded with spaces to the negotiated header width (10 bytes by
//! default). The payload itself is opaque to this layer; the layer above
//! puts UTF-8 JSON in it.
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_header, encode_frame, encode_header, FrameConfig, DEFAULT_HEADER_WIDTH,
    DEFAULT_MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
