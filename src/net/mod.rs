//! Networking: the listening loop and per-connection SSH session handling.

pub mod connection;
pub mod listener;

pub use connection::ConnectionHandler;
pub use listener::{Listener, ListenerError, ServerState};
