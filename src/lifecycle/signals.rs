//! OS signal handling.
//!
//! Translates Ctrl-C into the internal shutdown signal so the accept loop
//! can exit cleanly. In-flight connections are left to finish on their own.

use super::Shutdown;

/// Spawn a watcher that triggers `shutdown` on Ctrl-C.
pub fn trigger_on_ctrl_c(shutdown: Shutdown) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.trigger(),
            Err(error) => {
                // Without a working signal handler the server would be
                // unkillable from the terminal; shut down instead.
                tracing::error!(%error, "failed to install Ctrl-C handler");
                shutdown.trigger();
            }
        }
    });
}
