//! Configuration schema definitions.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use russh::keys::PrivateKey;

use super::validation::{self, ConfigError};

/// Version string advertised to connecting clients.
const DEFAULT_SERVER_ID: &str = "SSH-2.0-OpenSSH_9.7";

/// Delay applied to every authentication attempt before it is rejected.
const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(1250);

/// Validated server configuration, immutable after construction.
///
/// [`ServerConfig::new`] is the only way to build one, so holding a value
/// means the address parsed, the port is listenable, and the host key loaded.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the server binds to.
    pub address: IpAddr,

    /// Port the server binds to (never 0).
    pub port: u16,

    /// Parsed private host key presented during the handshake.
    pub host_key: PrivateKey,

    /// Event log destination; `None` disables the file (stdout echo remains).
    pub event_log_path: Option<PathBuf>,

    /// Credential log destination; `None` disables the file.
    pub credential_log_path: Option<PathBuf>,

    /// Per-attempt tarpit delay before the rejection is returned.
    pub auth_delay: Duration,

    /// Advertised SSH version string.
    pub server_id: String,
}

impl ServerConfig {
    /// Validate and build a configuration.
    ///
    /// Checks run in order: address, port, host key. The only side effect is
    /// reading the key file; no socket is touched.
    pub fn new(
        address: &str,
        port: u16,
        host_key_path: &Path,
        event_log_path: Option<PathBuf>,
        credential_log_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let address = validation::parse_address(address)?;
        let port = validation::check_port(port)?;
        let host_key = validation::load_host_key(host_key_path)?;

        Ok(Self {
            address,
            port,
            host_key,
            event_log_path,
            credential_log_path,
            auth_delay: DEFAULT_AUTH_DELAY,
            server_id: DEFAULT_SERVER_ID.to_string(),
        })
    }

    /// Socket address the listener will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}
