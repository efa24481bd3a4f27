//! Listening socket ownership and the accept loop.
//!
//! # Responsibilities
//! - Bind to the configured address with SO_REUSEADDR and a bounded backlog
//! - Accept connections and dispatch each to a fire-and-forget handler task
//! - Own the Stopped/Listening lifecycle; all exit paths converge on `stop()`
//!
//! # Design Decisions
//! - Dispatch never awaits a connection's handshake, so a stalled client
//!   cannot block acceptance of new connections
//! - In-flight connection tasks are not cancelled on shutdown; they run to
//!   their natural completion and hold no shared state beyond the log sinks

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};

use crate::auth::AuthPolicy;
use crate::capture::EventLog;
use crate::config::ServerConfig;
use crate::lifecycle::Shutdown;
use crate::net::connection::{self, ConnectionHandler};

/// Bound on pending, not-yet-accepted connections.
const BACKLOG: u32 = 50;

#[derive(Debug, Error)]
pub enum ListenerError {
    /// Binding or listening on the configured address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Listener lifecycle state, owned exclusively by [`Listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Listening,
}

/// Owns the listening socket and runs the accept loop.
pub struct Listener {
    bind_addr: SocketAddr,
    ssh_config: Arc<russh::server::Config>,
    policy: Arc<dyn AuthPolicy>,
    events: Arc<EventLog>,
    shutdown: Shutdown,
    state: ServerState,
    local_addr: Option<SocketAddr>,
}

impl Listener {
    /// Build a listener from a validated configuration.
    ///
    /// The policy is injected rather than constructed here so tests and
    /// future variants can swap it.
    pub fn new(
        config: &ServerConfig,
        policy: Arc<dyn AuthPolicy>,
        events: Arc<EventLog>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            bind_addr: config.bind_addr(),
            ssh_config: Arc::new(connection::session_config(config)),
            policy,
            events,
            shutdown,
            state: ServerState::Stopped,
            local_addr: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Address actually bound, available once `start()` has bound the socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Bind, listen, and run the accept loop until shutdown or a fatal
    /// accept error.
    ///
    /// Only valid from `Stopped`; calling while `Listening` is a no-op.
    /// Returns `Err` only for bind failures, which are logged and leave the
    /// listener `Stopped`. Accept-loop failures are logged and converge on
    /// the same clean-shutdown path as an interrupt.
    pub async fn start(&mut self) -> Result<(), ListenerError> {
        if self.state == ServerState::Listening {
            return Ok(());
        }

        let listener = match bind_with_backlog(self.bind_addr) {
            Ok(listener) => listener,
            Err(error) => {
                self.events
                    .append(&format!("[-] Error when binding host address: {error}"));
                self.stop();
                return Err(error);
            }
        };
        self.local_addr = listener.local_addr().ok();
        self.state = ServerState::Listening;
        self.events
            .append(&format!("[+] SSH server listening on {}", self.bind_addr));

        let mut shutdown = self.shutdown.subscribe();
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        self.events
                            .append(&format!("[+] Received connection from {peer}."));
                        let handler = ConnectionHandler::new(
                            Arc::clone(&self.ssh_config),
                            Arc::clone(&self.policy),
                            Arc::clone(&self.events),
                        );
                        tokio::spawn(async move {
                            handler.handle(stream, peer).await;
                        });
                    }
                    Err(error) => {
                        self.events
                            .append(&format!("[-] Client socket error: {error}"));
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    self.events.append("[+] Received interrupt signal.");
                    break;
                }
            }
        }

        drop(listener);
        self.stop();
        Ok(())
    }

    /// Transition to `Stopped`. Idempotent: only the first call after a
    /// start logs the shutdown; the socket itself is released when the
    /// accept loop exits.
    pub fn stop(&mut self) {
        if self.state == ServerState::Stopped {
            return;
        }
        self.events.append("[+] Shutting down server...");
        self.state = ServerState::Stopped;
    }
}

/// Bind a stream socket with address reuse and the fixed backlog.
fn bind_with_backlog(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    let bind = |addr: SocketAddr| -> std::io::Result<TcpListener> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        socket.listen(BACKLOG)
    };
    bind(addr).map_err(|source| ListenerError::Bind { addr, source })
}
