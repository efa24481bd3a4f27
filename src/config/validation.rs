//! Configuration validation.
//!
//! # Responsibilities
//! - Validate the bind address as an IPv4/IPv6 literal
//! - Validate the port range (0 is not a listenable port)
//! - Load and parse the SSH host key file
//!
//! # Design Decisions
//! - Validation is pure apart from reading the key file; no sockets are
//!   touched and nothing on disk is mutated
//! - Unreadable key file and unparseable key are distinct errors so the
//!   operator can tell a wrong path from broken key material

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use russh::keys::PrivateKey;
use thiserror::Error;

/// Errors raised while constructing a [`super::ServerConfig`].
///
/// All of these are fatal and reported before any network resource is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bind address is not a valid IPv4 or IPv6 literal.
    #[error("invalid server address: {0:?}")]
    InvalidAddress(String),

    /// The port is outside [1, 65535].
    #[error("invalid server port: {0}")]
    InvalidPort(u16),

    /// The host key file could not be read.
    #[error("cannot read host key file {path}: {source}")]
    UnreadableHostKey {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The host key file does not contain a usable private key.
    #[error("invalid host key {path}: {source}")]
    InvalidHostKey {
        path: PathBuf,
        source: russh::keys::Error,
    },
}

/// Parse the bind address as an IP literal.
pub fn parse_address(address: &str) -> Result<IpAddr, ConfigError> {
    address
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(address.to_string()))
}

/// Check that the port is listenable.
///
/// The upper bound is enforced by the `u16` type; only 0 is rejected here.
pub fn check_port(port: u16) -> Result<u16, ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }
    Ok(port)
}

/// Load a private host key from disk, distinguishing read failures from
/// parse failures.
pub fn load_host_key(path: &Path) -> Result<PrivateKey, ConfigError> {
    let pem = std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableHostKey {
        path: path.to_path_buf(),
        source,
    })?;
    russh::keys::decode_secret_key(&pem, None).map_err(|source| ConfigError::InvalidHostKey {
        path: path.to_path_buf(),
        source,
    })
}
