/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared payload length exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended in the middle of a frame header or payload.
    #[error("stream closed mid-frame (truncated header or payload)")]
    Truncated,

    /// The peer stopped accepting bytes while a frame was being written.
    #[error("stream closed (write rejected)")]
    Closed,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
