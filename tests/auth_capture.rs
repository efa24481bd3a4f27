//! End-to-end credential capture tests with a real SSH client.

use std::sync::Arc;

use russh::client::{self, AuthResult};

mod common;
use common::{spawn_honeypot, try_password, TrustingClient};

#[tokio::test]
async fn password_attempt_is_captured_and_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let event_path = dir.path().join("honeypot.log");
    let cred_path = dir.path().join("creds.csv");
    let server = spawn_honeypot(
        dir.path(),
        Some(event_path.clone()),
        Some(cred_path.clone()),
    )
    .await;

    let config = Arc::new(client::Config::default());
    let mut session = client::connect(config, server.addr, TrustingClient)
        .await
        .unwrap();

    let result = session.authenticate_password("root", "toor").await.unwrap();
    assert!(
        matches!(result, AuthResult::Failure { .. }),
        "honeypot must reject every credential"
    );

    // Unauthenticated sessions never get a channel.
    assert!(session.channel_open_session().await.is_err());
    drop(session);

    server.shutdown.trigger();
    let _ = server.handle.await;

    let creds = std::fs::read_to_string(&cred_path).unwrap();
    let lines: Vec<_> = creds.lines().collect();
    assert_eq!(lines[0], "Timestamp,Username,Password");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",root,toor"), "got {:?}", lines[1]);

    let events = std::fs::read_to_string(&event_path).unwrap();
    assert!(events.contains("Received connection from"));
    assert!(events.contains("SSH server listening on"));
}

#[tokio::test]
async fn empty_credentials_are_still_captured() {
    let dir = tempfile::tempdir().unwrap();
    let cred_path = dir.path().join("creds.csv");
    let server = spawn_honeypot(dir.path(), None, Some(cred_path.clone())).await;

    let result = try_password(server.addr, "", "").await;
    assert!(matches!(result, AuthResult::Failure { .. }));

    server.shutdown.trigger();
    let _ = server.handle.await;

    let creds = std::fs::read_to_string(&cred_path).unwrap();
    assert!(creds.lines().nth(1).unwrap().ends_with(",,"));
}

#[tokio::test]
async fn event_log_only_creates_no_credential_file() {
    let dir = tempfile::tempdir().unwrap();
    let event_path = dir.path().join("honeypot.log");
    let server = spawn_honeypot(dir.path(), Some(event_path.clone()), None).await;

    let result = try_password(server.addr, "admin", "admin").await;
    assert!(matches!(result, AuthResult::Failure { .. }));

    server.shutdown.trigger();
    let _ = server.handle.await;

    let events = std::fs::read_to_string(&event_path).unwrap();
    assert!(events.contains("Received connection from"));

    // Only the event log and the host key were written.
    let mut names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["honeypot.log", "host_key"]);
}

#[tokio::test]
async fn concurrent_clients_are_each_recorded_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let cred_path = dir.path().join("creds.csv");
    let server = spawn_honeypot(dir.path(), None, Some(cred_path.clone())).await;

    let mut attempts = Vec::new();
    for i in 0..5 {
        let addr = server.addr;
        attempts.push(tokio::spawn(async move {
            try_password(addr, &format!("user-{i}"), &format!("pass-{i}")).await
        }));
    }
    for attempt in attempts {
        let result = attempt.await.unwrap();
        assert!(matches!(result, AuthResult::Failure { .. }));
    }

    server.shutdown.trigger();
    let _ = server.handle.await;

    let creds = std::fs::read_to_string(&cred_path).unwrap();
    let records: Vec<_> = creds.lines().skip(1).collect();
    assert_eq!(records.len(), 5);
    for i in 0..5 {
        let expected = format!(",user-{i},pass-{i}");
        assert_eq!(
            records.iter().filter(|r| r.ends_with(&expected)).count(),
            1,
            "expected exactly one record for user-{i}"
        );
    }
}
