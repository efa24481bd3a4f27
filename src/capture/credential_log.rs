//! Captured credential log.
//!
//! # Responsibilities
//! - Record one `<timestamp>,<username>,<password>` line per attempt
//! - Keep each record atomic under concurrent writers
//! - Echo every capture to standard output regardless of file configuration
//!
//! # Known limitation
//! Values are written verbatim. The point of this log is forensic capture of
//! adversarial strings, so an attacker-supplied comma or newline lands in the
//! file as-is and can break the line structure. This is a documented property
//! of the format, not a bug; consumers must treat the file as best-effort CSV.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Header written when the credential log file is (re)created.
const HEADER: &str = "Timestamp,Username,Password\n";

/// Append-only credential sink, safe to share across connection tasks.
pub struct CredentialLog {
    file: Option<Mutex<File>>,
}

impl CredentialLog {
    /// Open the credential log, truncating and writing the header if a path
    /// is configured.
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

    /// Record one captured credential pair, flushed before return.
    ///
    /// The echo to standard output happens even when recording to the file
    /// fails, so the caller can report the error without losing the capture.
    pub fn record(&self, username: &str, password: &str) -> io::Result<()> {
        let timestamp = super::timestamp();
        tracing::info!(%username, %password, "captured credentials");
        if let Some(file) = &self.file {
            let line = format!("{timestamp},{username},{password}\n");
            let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }
}
