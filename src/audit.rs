/// Append-only, human-readable audit log.
///
/// Each event becomes one line of the form
/// `2024-05-01 14:03:12,512 - Moved /data/a.jpg to /data/Images/a.jpg`.
/// The log is owned by the caller and handed to the organizer as an
/// [`EventSink`].
use crate::events::{EventSink, OrganizeEvent};
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> OrganizeResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| OrganizeError::Audit {
                path: path.clone(),
                source: e,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a timestamped line.
    pub fn write_line(&mut self, message: &str) -> io::Result<()> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        writeln!(self.file, "{} - {}", timestamp, message)?;
        self.file.flush()
    }

    /// Like [`AuditLog::write_line`], but a failure is only reported through
    /// `tracing` so a full disk does not abort a run.
    pub fn note(&mut self, message: &str) {
        if let Err(e) = self.write_line(message) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not write audit log");
        }
    }
}

impl EventSink for AuditLog {
    fn record(&mut self, event: &OrganizeEvent) {
        self.note(&event.to_string());
    }
}
