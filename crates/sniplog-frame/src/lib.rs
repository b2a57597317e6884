//! Length-prefixed message framing for the browser native-messaging wire
//! protocol.
//!
//! Every message, in either direction, is framed as:
//! - A 4-byte little-endian payload length
//! - The payload bytes (a UTF-8 JSON document, opaque to this crate)
//!
//! There is no magic number and no channel id — the browser's framing is
//! exactly the bare length prefix. No partial reads, no buffer management
//! in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
