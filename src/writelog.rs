//! The on-disk record of completed writes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;

/// Serialized append-only log with one line per completed write.
///
/// Records have the form `Blob-<key>`. Lines from concurrent writers never
/// interleave; their relative order is whatever the scheduler produced.
#[derive(Debug)]
pub struct WriteLog {
    writer: Mutex<BufWriter<File>>,
}

impl WriteLog {
    /// Creates (or truncates) the log file at `path`.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Appends the record for one completed write.
    ///
    /// Log I/O failures are reported and swallowed; the write they describe
    /// has already been counted.
    pub fn append(&self, key: &str) {
        let mut writer = self.writer.lock().unwrap();
        let result = writeln!(writer, "Blob-{key}").and_then(|()| writer.flush());
        if let Err(error) = result {
            warn!(%error, "failed to append to the write log");
        }
    }
}
