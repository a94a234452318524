//! Connect/disconnect orchestration
//!
//! Owns the single active session: writes the one-shot credential file,
//! launches OpenVPN through the supervisor, starts the readiness watcher,
//! and tears everything down on disconnect. At most one session (and
//! therefore one watcher task) exists at any time.

use crate::config::VpnConfig;
use crate::error::{Result, VpnError};
use crate::types::Credentials;
use crate::vpn::process::{ProcessHandle, ProcessSupervisor};
use crate::vpn::watcher::{ReadinessWatcher, WatcherConfig};
use crate::vpn::{ConnectionEvent, ConnectionState};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, watch};

/// State associated with one connection attempt
struct Session {
    handle: ProcessHandle,
    watcher: ReadinessWatcher,
}

/// Orchestrates the OpenVPN session lifecycle
pub struct VpnController {
    config: VpnConfig,
    session: Option<Session>,
    event_tx: mpsc::UnboundedSender<ConnectionEvent>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
}

impl VpnController {
    /// Create a controller and the event stream its transitions arrive on
    pub fn new(config: VpnConfig) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _state_rx) = watch::channel(ConnectionState::Disconnected);

        let controller = Self {
            config,
            session: None,
            event_tx,
            state_tx: Arc::new(state_tx),
        };

        (controller, event_rx)
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to connection-state changes
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Check if a session is currently established
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// PID of the supervised OpenVPN process, if a session exists
    pub fn pid(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.handle.pid())
    }

    /// Start a connection attempt
    ///
    /// An active session is fully disconnected first. The credential file is
    /// written fresh (mode 0600) for this attempt, OpenVPN is launched with
    /// config/credential/log paths, and the readiness watcher takes over
    /// state transitions from there.
    pub async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        if self.session.is_some() {
            tracing::info!("Active session found, disconnecting before reconnect");
            self.disconnect().await?;
        }

        self.state_tx.send_replace(ConnectionState::Connecting);
        let _ = self.event_tx.send(ConnectionEvent::Connecting);

        if let Err(e) = write_auth_file(&self.config.auth_file_path, credentials).await {
            self.state_tx
                .send_replace(ConnectionState::Failed(e.to_string()));
            return Err(e.into());
        }

        let handle = match self.launch_openvpn() {
            Ok(handle) => handle,
            Err(e) => {
                remove_auth_file(&self.config.auth_file_path).await;
                self.state_tx
                    .send_replace(ConnectionState::Failed(e.to_string()));
                return Err(e.into());
            }
        };

        tracing::info!(pid = handle.pid(), "OpenVPN launched, starting readiness watcher");

        let watcher = ReadinessWatcher::spawn(
            WatcherConfig {
                log_path: self.config.log_path.clone(),
                poll_interval: self.config.poll_interval(),
                success_marker: self.config.success_marker.clone(),
            },
            handle.clone(),
            self.event_tx.clone(),
            Arc::clone(&self.state_tx),
        );

        self.session = Some(Session { handle, watcher });
        Ok(())
    }

    /// Tear down the active session
    ///
    /// Fails with [`VpnError::NotConnected`] when no session exists; in that
    /// case no event is emitted. Otherwise the watcher is cancelled and
    /// joined before the process is terminated, so no watcher task survives
    /// this call.
    pub async fn disconnect(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(VpnError::NotConnected)?;

        session.watcher.cancel().await;
        session.handle.terminate().await?;
        remove_auth_file(&self.config.auth_file_path).await;

        self.state_tx.send_replace(ConnectionState::Disconnected);
        let _ = self.event_tx.send(ConnectionEvent::Disconnected);

        tracing::info!("VPN session torn down");
        Ok(())
    }

    fn launch_openvpn(&self) -> std::result::Result<ProcessHandle, VpnError> {
        ProcessSupervisor::launch(
            &self.config.openvpn_path,
            [
                Path::new("--config"),
                self.config.config_path.as_path(),
                Path::new("--auth-user-pass"),
                self.config.auth_file_path.as_path(),
                Path::new("--log"),
                self.config.log_path.as_path(),
            ],
        )
    }
}

/// Write the one-shot credential file, restricting it to the owner
async fn write_auth_file(path: &Path, credentials: &Credentials) -> std::result::Result<(), VpnError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VpnError::CredentialWriteFailed {
                    reason: format!("Failed to create credential directory: {}", e),
                })?;
        }
    }

    // Owner-only from the first byte; chmod separately in case the file
    // already existed with looser permissions
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await
        .map_err(|e| VpnError::CredentialWriteFailed {
            reason: format!("Failed to create credential file: {}", e),
        })?;

    file.write_all(credentials.auth_file_contents().as_bytes())
        .await
        .map_err(|e| VpnError::CredentialWriteFailed {
            reason: format!("Failed to write credential file: {}", e),
        })?;
    file.flush()
        .await
        .map_err(|e| VpnError::CredentialWriteFailed {
            reason: format!("Failed to write credential file: {}", e),
        })?;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| VpnError::CredentialWriteFailed {
            reason: format!("Failed to restrict credential file permissions: {}", e),
        })?;

    tracing::debug!(path = %path.display(), "Credential file written");
    Ok(())
}

/// Best-effort removal of the credential artifact
async fn remove_auth_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "Failed to remove credential file: {}", e);
        }
    }
}
