//! OpenVPN process lifecycle supervision
//!
//! Launches the external OpenVPN client and tracks it by the exact PID
//! captured at spawn time. Liveness and termination always operate on the
//! tracked handle, never on process-name matching, so an unrelated process
//! with a similar name can never be signalled by mistake.

use crate::error::VpnError;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::sleep;

/// Handle to a launched (or externally known) process
///
/// Cloneable so the controller and the watcher can observe the same process.
/// When the child was spawned by us, liveness goes through `try_wait` so an
/// exited child is reaped instead of lingering as a zombie that a signal-0
/// probe would still report alive.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pid: u32,
    child: Arc<Mutex<Option<Child>>>,
}

impl ProcessHandle {
    /// Wrap a PID we did not spawn ourselves
    ///
    /// Liveness falls back to a signal-0 probe.
    pub fn from_pid(pid: u32) -> Self {
        Self {
            pid,
            child: Arc::new(Mutex::new(None)),
        }
    }

    /// The tracked process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Check whether the tracked process is still running
    pub fn is_running(&self) -> bool {
        let mut guard = match self.child.lock() {
            Ok(guard) => guard,
            Err(_) => return false,
        };

        match guard.as_mut() {
            // try_wait reaps the child if it has exited
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => kill(Pid::from_raw(self.pid as i32), None).is_ok(),
        }
    }

    /// Terminate the tracked process gracefully
    ///
    /// Sends SIGTERM first, waits up to 5 seconds, then sends SIGKILL if
    /// still alive. Idempotent: returns Ok when the process is already gone.
    pub async fn terminate(&self) -> Result<(), VpnError> {
        if !self.is_running() {
            return Ok(());
        }

        let pid = Pid::from_raw(self.pid as i32);

        tracing::info!("Sending SIGTERM to OpenVPN process {}", self.pid);
        match kill(pid, Signal::SIGTERM) {
            Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
            Err(e) => {
                return Err(VpnError::TerminationFailed {
                    reason: format!("Failed to send SIGTERM: {}", e),
                });
            }
        }

        // Wait up to 5 seconds for graceful termination
        for _ in 0..10 {
            sleep(Duration::from_millis(500)).await;
            if !self.is_running() {
                tracing::info!("OpenVPN process {} terminated gracefully", self.pid);
                return Ok(());
            }
        }

        tracing::warn!("Graceful shutdown timed out, sending SIGKILL to {}", self.pid);
        match kill(pid, Signal::SIGKILL) {
            Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
            Err(e) => {
                return Err(VpnError::TerminationFailed {
                    reason: format!("Failed to send SIGKILL: {}", e),
                });
            }
        }

        // Wait briefly for SIGKILL to take effect
        sleep(Duration::from_millis(500)).await;

        if self.is_running() {
            Err(VpnError::UnresponsiveProcess)
        } else {
            Ok(())
        }
    }
}

/// Launches the external OpenVPN client
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    /// Spawn the executable with the given arguments and capture its PID
    ///
    /// The child's stdio is discarded; all useful output goes to the log
    /// file the caller points OpenVPN at.
    pub fn launch<I, S>(executable: &Path, args: I) -> Result<ProcessHandle, VpnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        // Pre-check explicit paths so a missing binary reports cleanly even
        // on platforms where spawn errors are vague
        if executable.components().count() > 1 && !executable.exists() {
            return Err(VpnError::ExecutableNotFound {
                path: executable.to_string_lossy().to_string(),
            });
        }

        let child = Command::new(executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VpnError::ExecutableNotFound {
                    path: executable.to_string_lossy().to_string(),
                },
                _ => VpnError::LaunchFailed {
                    reason: format!("Failed to spawn {}: {}", executable.display(), e),
                },
            })?;

        let pid = child.id().ok_or_else(|| VpnError::LaunchFailed {
            reason: "Child exited before its PID could be captured".to_string(),
        })?;

        tracing::debug!("OpenVPN process spawned with PID {}", pid);

        Ok(ProcessHandle {
            pid,
            child: Arc::new(Mutex::new(Some(child))),
        })
    }
}
