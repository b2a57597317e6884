use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Append-only snippet log.
///
/// The file handle is opened and released per call; nothing is held open
/// between messages. I/O failures never escape this type: they are reported
/// on the operator channel and folded into the boolean result.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log file with a creation-timestamp header if it does not
    /// exist yet.
    ///
    /// Failure is non-fatal: the host keeps serving and each append reports
    /// its own result.
    pub fn ensure_initialized(&self) {
        if self.path.exists() {
            return;
        }
        if let Err(err) = self.write_header() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to create log file");
        }
    }

    fn write_header(&self) -> std::io::Result<()> {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        writeln!(file, "# sniplog log file created at {timestamp}")?;
        Ok(())
    }

    /// Append one snippet as a newline-terminated line.
    ///
    /// Empty text is a no-op success: nothing to log is not an error.
    /// Returns `false` when the open/write/flush fails; the error itself is
    /// reported here and never propagated.
    pub fn append(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        match self.try_append(text) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to append to log");
                false
            }
        }
    }

    fn try_append(&self, text: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}
