//! Operational event log.
//!
//! # Responsibilities
//! - Append timestamped free-text events (connects, errors, shutdowns)
//! - Keep each line atomic under concurrent writers
//! - Echo every event to standard output regardless of file configuration

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Header written when the event log file is (re)created.
const HEADER: &str = "SSH Honeypot Event Log:\n\n";

/// Append-only event sink, safe to share across connection tasks.
///
/// The mutex is held for exactly one line write, so a slow writer can delay
/// but never corrupt another's line.
pub struct EventLog {
    file: Option<Mutex<File>>,
}

impl EventLog {
    /// Open the event log.
    ///
    /// If a path is given the file is truncated and the header written before
    /// any entries. With no path, [`append`](Self::append) only echoes.
    pub fn open(path: Option<&Path>) -> io::Result<Self> {
        let file = match path {
            Some(path) => {
                let mut file = File::create(path)?;
                file.write_all(HEADER.as_bytes())?;
                file.flush()?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { file })
    }

    /// Append one event line, flushed before return.
    ///
    /// Write failures are best-effort: they are surfaced as diagnostics and
    /// never propagate to the caller, so a broken log file cannot take down
    /// the capture path.
    pub fn append(&self, message: &str) {
        tracing::info!("{message}");
        if let Some(file) = &self.file {
            let line = format!("{} - {}\n", super::timestamp(), message);
            let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Err(error) = file
                .write_all(line.as_bytes())
                .and_then(|()| file.flush())
            {
                tracing::warn!(%error, "failed to append to event log");
            }
        }
    }
}
