//! Authentication decision policy.
//!
//! The transport layer calls back into a single-method trait once per
//! password attempt. The handler is injected with a policy at session setup
//! rather than being a server subclass, so tarpit timing or other behaviors
//! can be swapped without touching the connection plumbing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::capture::{CredentialLog, EventLog};

/// Binary outcome of an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Accept,
    Reject,
}

/// Decides the outcome of one submitted credential pair.
#[async_trait]
pub trait AuthPolicy: Send + Sync {
    /// Evaluate one attempt. Must be infallible from the transport's point of
    /// view: internal failures are reported through the event log, never
    /// raised.
    async fn evaluate(&self, username: &str, password: &str) -> AuthOutcome;
}

/// The honeypot policy: record the credentials, stall, reject.
pub struct RejectAllPolicy {
    credentials: Arc<CredentialLog>,
    events: Arc<EventLog>,
    delay: Duration,
}

impl RejectAllPolicy {
    pub fn new(credentials: Arc<CredentialLog>, events: Arc<EventLog>, delay: Duration) -> Self {
        Self {
            credentials,
            events,
            delay,
        }
    }
}

#[async_trait]
impl AuthPolicy for RejectAllPolicy {
    async fn evaluate(&self, username: &str, password: &str) -> AuthOutcome {
        if let Err(error) = self.credentials.record(username, password) {
            self.events
                .append(&format!("[-] Failed to record credentials: {error}"));
        }

        // Throttles per-connection brute-force rate; only this connection's
        // task sleeps.
        tokio::time::sleep(self.delay).await;

        AuthOutcome::Reject
    }
}
