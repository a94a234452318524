// Integration tests for connect/disconnect orchestration
//
// A shell script stands in for the OpenVPN binary: it writes the readiness
// marker to the log path it was given and then sleeps like a real client.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tunwatch_core::config::VpnConfig;
use tunwatch_core::error::{TunwatchError, VpnError};
use tunwatch_core::types::Credentials;
use tunwatch_core::vpn::{ConnectionEvent, ConnectionState, VpnController};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fake client invoked as: --config C --auth-user-pass A --log L
fn fake_openvpn(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-openvpn",
        "#!/bin/sh\nshift 5\necho 'Initialization Sequence Completed' > \"$1\"\nexec sleep 30\n",
    )
}

/// Fake client that exits immediately without ever writing the log
fn crashing_openvpn(dir: &Path) -> PathBuf {
    write_script(dir, "crashing-openvpn", "#!/bin/sh\nexit 1\n")
}

fn test_config(dir: &TempDir, openvpn: PathBuf) -> VpnConfig {
    let ovpn = dir.path().join("client.ovpn");
    std::fs::write(&ovpn, "remote vpn.example.com 1194\n").unwrap();

    let mut config = VpnConfig::new(
        openvpn,
        ovpn,
        dir.path().join("vpn.log"),
        dir.path().join("auth.txt"),
    );
    config.poll_interval_ms = 10;
    config
}

fn credentials() -> Credentials {
    Credentials::new("alice", "hunter2")
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ConnectionEvent>) -> ConnectionEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_full_connect_disconnect_cycle() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, fake_openvpn(dir.path()));
    let auth_path = config.auth_file_path.clone();

    // A stale, loose-permission file at the credential path gets replaced
    std::fs::write(&auth_path, "stale\n").unwrap();
    let mut perms = std::fs::metadata(&auth_path).unwrap().permissions();
    perms.set_mode(0o644);
    std::fs::set_permissions(&auth_path, perms).unwrap();

    let (mut controller, mut events) = VpnController::new(config);
    let state_rx = controller.state_receiver();
    controller.connect(&credentials()).await.unwrap();

    assert!(controller.pid().is_some());
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::CheckingLogs);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connected);
    assert!(controller.is_connected());

    // The watcher publishes the state before mirroring it as an event
    assert_eq!(*state_rx.borrow(), ConnectionState::Connected);

    // Credential artifact: fresh, owner-only, two lines
    let metadata = std::fs::metadata(&auth_path).unwrap();
    assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    let contents = std::fs::read_to_string(&auth_path).unwrap();
    assert_eq!(contents, "alice\nhunter2\n");

    controller.disconnect().await.unwrap();
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Disconnected);
    assert_eq!(controller.state(), ConnectionState::Disconnected);
    assert!(!auth_path.exists());
}

#[tokio::test]
async fn test_disconnect_without_session_fails_without_events() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, fake_openvpn(dir.path()));

    let (mut controller, mut events) = VpnController::new(config);
    let result = controller.disconnect().await;

    assert!(matches!(
        result,
        Err(TunwatchError::Vpn(VpnError::NotConnected))
    ));
    assert!(events.try_recv().is_err());
    assert_eq!(controller.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_while_connected_disconnects_first() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, fake_openvpn(dir.path()));

    let (mut controller, mut events) = VpnController::new(config);
    controller.connect(&credentials()).await.unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::CheckingLogs);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connected);

    let first_pid = controller.pid().unwrap();

    // Second connect tears the first session down before launching again
    controller.connect(&credentials()).await.unwrap();
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Disconnected);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::CheckingLogs);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connected);

    let second_pid = controller.pid().unwrap();
    assert_ne!(first_pid, second_pid);

    controller.disconnect().await.unwrap();
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Disconnected);
}

#[tokio::test]
async fn test_launch_failure_surfaces_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, dir.path().join("missing-openvpn"));
    let auth_path = config.auth_file_path.clone();

    let (mut controller, mut events) = VpnController::new(config);
    let result = controller.connect(&credentials()).await;

    assert!(matches!(
        result,
        Err(TunwatchError::Vpn(VpnError::ExecutableNotFound { .. }))
    ));
    assert!(controller.state().is_failed());

    // "connecting" was already emitted, but nothing else follows
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert!(events.try_recv().is_err());

    // The one-shot credential file does not outlive the failed attempt
    assert!(!auth_path.exists());

    // And with no session, disconnect still reports NotConnected
    assert!(matches!(
        controller.disconnect().await,
        Err(TunwatchError::Vpn(VpnError::NotConnected))
    ));
}

#[tokio::test]
async fn test_credential_write_failure_marks_attempt_failed() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, fake_openvpn(dir.path()));

    // A regular file where the credential directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    config.auth_file_path = blocker.join("auth.txt");

    let (mut controller, mut events) = VpnController::new(config);
    let result = controller.connect(&credentials()).await;

    assert!(matches!(
        result,
        Err(TunwatchError::Vpn(VpnError::CredentialWriteFailed { .. }))
    ));

    // The attempt is over; the state must not stay at Connecting
    assert!(controller.state().is_failed());

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_process_exit_before_readiness_fails_the_attempt() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, crashing_openvpn(dir.path()));

    let (mut controller, mut events) = VpnController::new(config);
    controller.connect(&credentials()).await.unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Connecting);
    assert_eq!(next_event(&mut events).await, ConnectionEvent::CheckingLogs);
    match next_event(&mut events).await {
        ConnectionEvent::FailedToConnect { .. } => {}
        other => panic!("Expected FailedToConnect, got {:?}", other),
    }
    assert!(controller.state().is_failed());

    // Cleanup of the failed session is an explicit disconnect
    controller.disconnect().await.unwrap();
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Disconnected);
}
