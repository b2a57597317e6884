use std::io::{Read, Write};
use std::path::PathBuf;

use sniplog_frame::{FrameConfig, FrameReader, FrameWriter, DEFAULT_MAX_PAYLOAD};

use crate::message::{self, Request, Response};
use crate::sink::LogSink;

/// Host configuration, passed in at construction. No globals: tests build a
/// host around in-memory streams and a scratch log path.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Path of the append-only snippet log.
    pub log_path: PathBuf,
    /// Maximum accepted frame payload in bytes.
    pub max_payload_size: usize,
}

impl HostConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// The single control loop between the framed transport and the log sink.
///
/// One reader on the input stream, one writer on the output stream, one
/// sink. Single-threaded and blocking throughout; there is exactly one
/// in-flight request at any time.
pub struct Host<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    sink: LogSink,
}

impl<R: Read, W: Write> Host<R, W> {
    pub fn new(input: R, output: W, config: HostConfig) -> Self {
        let frame_config = FrameConfig {
            max_payload_size: config.max_payload_size,
        };
        Self {
            reader: FrameReader::with_config(input, frame_config.clone()),
            writer: FrameWriter::with_config(output, frame_config),
            sink: LogSink::new(config.log_path),
        }
    }

    /// Serve frames until the peer closes the input stream.
    ///
    /// Per-message faults — framing, decoding, sink I/O — produce one error
    /// response each and the loop keeps going. Clean end-of-stream is the
    /// only way out.
    pub fn run(&mut self) {
        self.sink.ensure_initialized();

        loop {
            let response = match self.reader.read_frame() {
                Ok(Some(payload)) => self.handle(&payload),
                Ok(None) => {
                    tracing::info!("input stream closed, shutting down");
                    return;
                }
                Err(err) => {
                    tracing::error!(error = %err, "framing fault");
                    Response::fault(err.to_string())
                }
            };
            self.respond(&response);
        }
    }

    fn handle(&self, payload: &[u8]) -> Response {
        match message::decode_request(payload) {
            Ok(request) => Response::logged(self.log(&request)),
            Err(err) => {
                tracing::error!(error = %err, "request decode fault");
                Response::fault(err.to_string())
            }
        }
    }

    fn log(&self, request: &Request) -> bool {
        self.sink.append(request.text.as_deref().unwrap_or(""))
    }

    /// Best-effort response delivery. A failure here cannot be surfaced to
    /// the peer (the outbound channel is the one that failed), so it is
    /// reported on the operator channel and the loop moves on.
    fn respond(&mut self, response: &Response) {
        let payload = match message::encode_response(response) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "response encode fault");
                return;
            }
        };
        if let Err(err) = self.writer.send(&payload) {
            tracing::error!(error = %err, "failed to write response frame");
        }
    }
}
