//! Shared utilities for integration tests: a honeypot instance on an
//! ephemeral port and a minimal SSH client to poke it with.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh::client;
use russh::keys::ssh_key::rand_core::OsRng;
use russh::keys::ssh_key::LineEnding;
use russh::keys::{Algorithm, PrivateKey, PublicKey};

use ssh_honeypot::auth::RejectAllPolicy;
use ssh_honeypot::capture::{CredentialLog, EventLog};
use ssh_honeypot::config::ServerConfig;
use ssh_honeypot::lifecycle::Shutdown;
use ssh_honeypot::net::listener::Listener;

/// Write a freshly generated Ed25519 host key next to the test's other files.
pub fn write_host_key(dir: &std::path::Path) -> PathBuf {
    let key = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).unwrap();
    let path = dir.join("host_key");
    std::fs::write(&path, key.to_openssh(LineEnding::LF).unwrap().as_bytes()).unwrap();
    path
}

/// Grab a port the OS considers free right now.
///
/// There is a small window between probing and the server binding; good
/// enough for tests.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
}

/// Start a honeypot with a zero tarpit delay on an ephemeral port.
pub async fn spawn_honeypot(
    dir: &std::path::Path,
    event_log: Option<PathBuf>,
    credential_log: Option<PathBuf>,
) -> TestServer {
    let key_path = write_host_key(dir);
    let port = free_port();
    let mut config =
        ServerConfig::new("127.0.0.1", port, &key_path, event_log, credential_log).unwrap();
    config.auth_delay = Duration::ZERO;

    let events = Arc::new(EventLog::open(config.event_log_path.as_deref()).unwrap());
    let credentials = Arc::new(CredentialLog::open(config.credential_log_path.as_deref()).unwrap());
    let policy = Arc::new(RejectAllPolicy::new(
        credentials,
        Arc::clone(&events),
        config.auth_delay,
    ));

    let shutdown = Shutdown::new();
    let addr = config.bind_addr();
    let mut listener = Listener::new(&config, policy, events, shutdown.clone());
    let handle = tokio::spawn(async move {
        let _ = listener.start().await;
    });

    // Give the accept loop a moment to come up.
    tokio::time::sleep(Duration::from_millis(300)).await;

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client handler that trusts any host key; these tests talk to a server
/// they just started.
pub struct TrustingClient;

impl client::Handler for TrustingClient {
    type Error = russh::Error;

    async fn check_server_key(&mut self, _server_key: &PublicKey) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Connect and submit one password attempt, returning the server's answer.
pub async fn try_password(addr: SocketAddr, user: &str, password: &str) -> client::AuthResult {
    let config = Arc::new(client::Config::default());
    let mut session = client::connect(config, addr, TrustingClient)
        .await
        .expect("honeypot did not accept the connection");
    session
        .authenticate_password(user, password)
        .await
        .expect("auth exchange failed")
}
