use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{decode_frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frame payloads from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete payloads.
/// A clean end-of-stream at a frame boundary yields `Ok(None)`; that is the
/// peer's normal shutdown signal, not an error.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    /// Bytes of a refused oversized payload still owed to the discard pass.
    skip: usize,
    eof: bool,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            skip: 0,
            eof: false,
        }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Ok(None)` when the stream ends cleanly at a frame boundary.
    /// A stream that ends mid-header or mid-payload yields one
    /// `FrameError::Truncated`, after which the partial bytes are dropped
    /// and subsequent calls report clean end-of-stream.
    ///
    /// A frame whose declared length exceeds the configured maximum yields
    /// `FrameError::PayloadTooLarge`; the reader discards exactly the
    /// declared payload so the next call picks up at the following frame.
    /// With no magic number in the wire format this is the only way to
    /// resynchronize.
    pub fn read_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            let owed = self.skip.min(self.buf.len());
            if owed > 0 {
                self.buf.advance(owed);
                self.skip -= owed;
            }

            if self.skip == 0 {
                match decode_frame(&mut self.buf, self.config.max_payload_size) {
                    Ok(Some(payload)) => return Ok(Some(payload)),
                    Ok(None) => {} // Need more data
                    Err(FrameError::PayloadTooLarge { size, max }) => {
                        self.buf.advance(HEADER_SIZE);
                        self.skip = size;
                        tracing::warn!(size, max, "discarding oversized frame payload");
                        return Err(FrameError::PayloadTooLarge { size, max });
                    }
                    Err(err) => return Err(err),
                }
            }

            if self.eof {
                if self.buf.is_empty() && self.skip == 0 {
                    return Ok(None);
                }
                self.buf.clear();
                self.skip = 0;
                return Err(FrameError::Truncated);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
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

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
