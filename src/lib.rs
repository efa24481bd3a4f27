//! Low-interaction SSH honeypot.
//!
//! Exposes a real SSH endpoint, accepts authentication attempts, records every
//! submitted username/password pair, and rejects all of them. No shell or
//! command execution is ever provided to a connecting client.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │                 SSH HONEYPOT                   │
//!                   │                                                │
//!    SSH Client     │  ┌──────────┐ spawn  ┌────────────────────┐   │
//!    ───────────────┼─▶│ listener │───────▶│ connection handler │   │
//!                   │  └──────────┘        │  (russh handshake) │   │
//!                   │        │             └─────────┬──────────┘   │
//!                   │        │                       │ per attempt  │
//!                   │        │                       ▼              │
//!                   │        │             ┌────────────────────┐   │
//!                   │        │             │  reject-all policy │   │
//!                   │        │             └─────────┬──────────┘   │
//!                   │        ▼                       ▼              │
//!                   │  ┌──────────┐        ┌────────────────────┐   │
//!                   │  │ event log│        │   credential log   │   │
//!                   │  └──────────┘        └────────────────────┘   │
//!                   └───────────────────────────────────────────────┘
//! ```
//!
//! The accept loop never waits on a connection: each accepted stream is handed
//! to a fire-and-forget task that drives the SSH handshake and dies with the
//! connection. The two log sinks are the only shared mutable state and
//! serialize their writes internally.

// Core subsystems
pub mod auth;
pub mod capture;
pub mod config;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;

pub use capture::{CredentialLog, EventLog};
pub use config::{ConfigError, ServerConfig};
pub use lifecycle::Shutdown;
pub use net::listener::Listener;
