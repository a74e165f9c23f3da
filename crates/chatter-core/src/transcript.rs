//! Append-only session log.
//!
//! Each process run gets one plain-text file, `chat_<timestamp>.txt`, under
//! the configured log directory. Every message is written as
//! `<label>: <message>` followed by a blank line.

use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Timestamp format used in session log file names.
const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// The session log of one process run.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    /// Create the log directory and an empty session file named after `started_at`.
    ///
    /// An existing file with the same name is kept and appended to.
    pub fn create(log_dir: &Path, started_at: DateTime<Local>) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("chat_{}.txt", started_at.format(FILE_STAMP_FORMAT)));
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    /// Create the session file for a process starting now.
    pub fn start(log_dir: &Path) -> io::Result<Self> {
        Self::create(log_dir, Local::now())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one message. The file is opened and closed per call.
    pub fn append(&self, label: &str, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "{}: {}\n\n", label, message)?;
        Ok(())
    }
}
