//! CLI entry point for the SSH honeypot.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ssh_honeypot::auth::RejectAllPolicy;
use ssh_honeypot::capture::{CredentialLog, EventLog};
use ssh_honeypot::config::ServerConfig;
use ssh_honeypot::lifecycle::{signals, Shutdown};
use ssh_honeypot::net::listener::Listener;

/// SSH honeypot that logs access attempts and cleartext credentials.
#[derive(Parser, Debug)]
#[command(
    version,
    after_help = "Generate a host key with: ssh-keygen -t rsa -f <KEY_NAME>"
)]
struct Args {
    /// IPv4 or IPv6 address the server will listen on
    address: String,

    /// Port the server will listen on
    port: u16,

    /// Private SSH host key (/path/to/private.key)
    host_key: PathBuf,

    /// Log events to FILE (default ./honeypot.log when no value is given)
    #[arg(
        short = 'l',
        long = "logfile",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "honeypot.log"
    )]
    logfile: Option<PathBuf>,

    /// Log captured credentials to csv FILE (default ./creds.csv)
    #[arg(
        short = 'c',
        long = "csv",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "creds.csv"
    )]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ssh_honeypot=info,russh=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Configuration errors are fatal before any socket is opened.
    let config = match ServerConfig::new(
        &args.address,
        args.port,
        &args.host_key,
        args.logfile,
        args.csv,
    ) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let events = match EventLog::open(config.event_log_path.as_deref()) {
        Ok(events) => Arc::new(events),
        Err(error) => {
            tracing::error!(%error, "cannot open event log");
            return ExitCode::FAILURE;
        }
    };
    let credentials = match CredentialLog::open(config.credential_log_path.as_deref()) {
        Ok(credentials) => Arc::new(credentials),
        Err(error) => {
            tracing::error!(%error, "cannot open credential log");
            return ExitCode::FAILURE;
        }
    };

    let policy = Arc::new(RejectAllPolicy::new(
        credentials,
        Arc::clone(&events),
        config.auth_delay,
    ));

    let shutdown = Shutdown::new();
    signals::trigger_on_ctrl_c(shutdown.clone());

    let mut listener = Listener::new(&config, policy, events, shutdown);
    match listener.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
