//! Durable capture sinks shared by all connection handlers.
//!
//! Both sinks follow the same discipline: an optional file destination that is
//! truncated and given a fixed header on open, one internally-locked write per
//! line so concurrent connections never interleave mid-line, and an
//! unconditional echo through `tracing` whether or not a file is configured.

pub mod credential_log;
pub mod event_log;

pub use credential_log::CredentialLog;
pub use event_log::EventLog;

/// Timestamp used at the front of every log line.
pub(crate) fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
