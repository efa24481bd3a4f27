//! Per-connection SSH session handling.
//!
//! # Responsibilities
//! - Drive the server-side handshake on one accepted stream via russh
//! - Route every password attempt through the injected [`AuthPolicy`]
//! - Contain all per-connection errors; nothing escapes to the accept loop
//!
//! # Design Decisions
//! - Because the policy rejects everything, a session that ends without ever
//!   opening a channel is the expected outcome and is not logged as an error;
//!   only explicit transport failures are

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use russh::keys::PublicKey;
use russh::server::{Auth, Config as SshConfig, Handler};
use russh::{MethodKind, MethodSet, SshId};
use tokio::net::TcpStream;

use crate::auth::{AuthOutcome, AuthPolicy};
use crate::capture::EventLog;
use crate::config::ServerConfig;

/// Build the russh server configuration for one honeypot instance.
///
/// The transport's own rejection tarpit is disabled; the delay lives in the
/// policy so it stays swappable.
pub(crate) fn session_config(config: &ServerConfig) -> SshConfig {
    SshConfig {
        server_id: SshId::Standard(config.server_id.clone()),
        keys: vec![config.host_key.clone()],
        methods: password_only(),
        auth_rejection_time: Duration::ZERO,
        auth_rejection_time_initial: Some(Duration::ZERO),
        inactivity_timeout: Some(Duration::from_secs(60)),
        ..Default::default()
    }
}

fn password_only() -> MethodSet {
    (&[MethodKind::Password]).as_slice().into()
}

/// Owns one accepted connection end-to-end.
///
/// Cheap to construct; the listener builds a fresh one per connection and
/// hands it to a fire-and-forget task.
pub struct ConnectionHandler {
    config: Arc<SshConfig>,
    policy: Arc<dyn AuthPolicy>,
    events: Arc<EventLog>,
}

impl ConnectionHandler {
    pub fn new(
        config: Arc<SshConfig>,
        policy: Arc<dyn AuthPolicy>,
        events: Arc<EventLog>,
    ) -> Self {
        Self {
            config,
            policy,
            events,
        }
    }

    /// Run the SSH session on `stream` to completion.
    ///
    /// The stream is owned by the session and torn down on every exit path.
    /// Handshake failures and transport errors are logged with the peer
    /// address and swallowed here.
    pub async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        let session = SessionHandler {
            policy: Arc::clone(&self.policy),
            peer,
        };
        match russh::server::run_stream(Arc::clone(&self.config), stream, session).await {
            Ok(running) => {
                if let Err(error) = running.await {
                    if !is_expected_close(&error) {
                        self.events.append(&format!(
                            "[-] Error handling client connection from {peer}: {error}"
                        ));
                    }
                }
            }
            Err(error) => {
                self.events.append(&format!(
                    "[-] Error handling client connection from {peer}: {error}"
                ));
            }
        }
    }
}

/// A peer that gives up after failing to authenticate is the normal case for
/// a reject-all server, not an anomaly worth an error line.
fn is_expected_close(error: &russh::Error) -> bool {
    match error {
        russh::Error::Disconnect => true,
        russh::Error::IO(io) => matches!(
            io.kind(),
            std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::ConnectionReset
        ),
        _ => false,
    }
}

/// russh callback surface for a single session.
struct SessionHandler {
    policy: Arc<dyn AuthPolicy>,
    peer: SocketAddr,
}

impl SessionHandler {
    fn reject_toward_password(&self) -> Auth {
        Auth::Reject {
            proceed_with_methods: Some(password_only()),
            partial_success: false,
        }
    }
}

impl Handler for SessionHandler {
    type Error = russh::Error;

    async fn auth_none(&mut self, user: &str) -> Result<Auth, Self::Error> {
        tracing::debug!(peer = %self.peer, %user, "auth none attempt");
        // Steer the client toward submitting a password.
        Ok(self.reject_toward_password())
    }

    async fn auth_publickey(
        &mut self,
        user: &str,
        _public_key: &PublicKey,
    ) -> Result<Auth, Self::Error> {
        tracing::debug!(peer = %self.peer, %user, "public key attempt");
        Ok(self.reject_toward_password())
    }

    async fn auth_password(&mut self, user: &str, password: &str) -> Result<Auth, Self::Error> {
        match self.policy.evaluate(user, password).await {
            AuthOutcome::Accept => Ok(Auth::Accept),
            AuthOutcome::Reject => Ok(self.reject_toward_password()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use russh::keys::ssh_key::rand_core::OsRng;
    use russh::keys::Algorithm;
    use russh::keys::PrivateKey;

    fn test_config() -> ServerConfig {
        ServerConfig {
            address: "127.0.0.1".parse().unwrap(),
            port: 2222,
            host_key: PrivateKey::random(&mut OsRng, Algorithm::Ed25519).unwrap(),
            event_log_path: None,
            credential_log_path: None,
            auth_delay: Duration::ZERO,
            server_id: "SSH-2.0-OpenSSH_9.7".to_string(),
        }
    }

    #[test]
    fn session_config_disables_the_transport_tarpit() {
        let config = session_config(&test_config());
        assert_eq!(config.auth_rejection_time, Duration::ZERO);
        assert_eq!(config.auth_rejection_time_initial, Some(Duration::ZERO));
        assert_eq!(config.keys.len(), 1);
    }

    #[test]
    fn expected_closes_are_not_errors() {
        assert!(is_expected_close(&russh::Error::Disconnect));
        assert!(is_expected_close(&russh::Error::IO(
            std::io::ErrorKind::UnexpectedEof.into()
        )));
        assert!(!is_expected_close(&russh::Error::IO(
            std::io::ErrorKind::Other.into()
        )));
    }
}
