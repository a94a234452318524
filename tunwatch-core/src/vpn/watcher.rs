//! Log-based readiness watcher
//!
//! One background task per session polls the OpenVPN log file and the
//! tracked process. Before readiness it looks for the success marker or a
//! fatal log line; after readiness it keeps watching process liveness.
//! Cancellation is cooperative and observed within one poll interval.

use crate::vpn::log_scan::{read_log, LogScanner, LogVerdict};
use crate::vpn::process::ProcessHandle;
use crate::vpn::{ConnectionEvent, ConnectionState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Watcher parameters
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Log file to poll (may not exist yet when polling starts)
    pub log_path: PathBuf,

    /// Delay between polls; the first poll happens immediately
    pub poll_interval: Duration,

    /// Substring that marks a successfully established tunnel
    pub success_marker: String,
}

/// Handle to a running readiness watcher task
pub struct ReadinessWatcher {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReadinessWatcher {
    /// Spawn the polling task for one session
    ///
    /// Transitions are published through `state` and mirrored as events on
    /// `events`. The task exits on readiness failure, process death, or
    /// cancellation; after readiness it stays alive to detect process death.
    pub fn spawn(
        config: WatcherConfig,
        handle: ProcessHandle,
        events: mpsc::UnboundedSender<ConnectionEvent>,
        state: Arc<watch::Sender<ConnectionState>>,
    ) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(run_poll_loop(config, handle, events, state, cancel_rx));

        Self { cancel_tx, task }
    }

    /// Request cancellation and wait for the task to exit
    ///
    /// After this returns no further event is emitted by the watcher.
    pub async fn cancel(self) {
        let _ = self.cancel_tx.send(true);
        let _ = self.task.await;
    }

    /// Whether the watcher task has already exited on its own
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run_poll_loop(
    config: WatcherConfig,
    handle: ProcessHandle,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    state: Arc<watch::Sender<ConnectionState>>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let scanner = LogScanner::new(&config.success_marker);
    let mut ticker = tokio::time::interval(config.poll_interval);
    let mut ready = false;

    let _ = events.send(ConnectionEvent::CheckingLogs);
    tracing::debug!(
        log = %config.log_path.display(),
        pid = handle.pid(),
        interval_ms = config.poll_interval.as_millis() as u64,
        "Readiness watcher started"
    );

    loop {
        tokio::select! {
            changed = cancel_rx.changed() => {
                // Either an explicit cancel or the controller dropped us
                if changed.is_err() || *cancel_rx.borrow() {
                    tracing::debug!("Readiness watcher cancelled");
                    break;
                }
            }

            _ = ticker.tick() => {
                if !handle.is_running() {
                    if ready {
                        tracing::warn!(pid = handle.pid(), "OpenVPN process disappeared after connect");
                        state.send_replace(ConnectionState::Failed("process killed".to_string()));
                        let _ = events.send(ConnectionEvent::ProcessKilled);
                    } else {
                        tracing::warn!(pid = handle.pid(), "OpenVPN process exited before readiness");
                        let detail = "process exited before the tunnel came up".to_string();
                        state.send_replace(ConnectionState::Failed(detail.clone()));
                        let _ = events.send(ConnectionEvent::FailedToConnect { detail });
                    }
                    break;
                }

                if !ready {
                    let content = read_log(&config.log_path).await;
                    match scanner.scan(&content) {
                        LogVerdict::Ready => {
                            ready = true;
                            tracing::info!(pid = handle.pid(), "Tunnel established");
                            state.send_replace(ConnectionState::Connected);
                            let _ = events.send(ConnectionEvent::Connected);
                            // Keep polling liveness only from here on
                        }
                        LogVerdict::Fatal { line } => {
                            tracing::warn!(detail = %line, "Fatal line in OpenVPN log");
                            state.send_replace(ConnectionState::Failed(line.clone()));
                            let _ = events.send(ConnectionEvent::FailedToConnect { detail: line });
                            break;
                        }
                        LogVerdict::Pending => {}
                    }
                }
            }
        }
    }
}
