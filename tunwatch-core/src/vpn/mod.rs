//! VPN supervision module
//!
//! Process lifecycle supervision, log-based readiness detection, and
//! connect/disconnect orchestration for an external OpenVPN client.

pub mod controller;
pub mod event;
pub mod log_scan;
pub mod process;
pub mod state;
pub mod watcher;

// Public re-exports
pub use controller::VpnController;
pub use event::ConnectionEvent;
pub use log_scan::{LogScanner, LogVerdict};
pub use process::{ProcessHandle, ProcessSupervisor};
pub use state::ConnectionState;
pub use watcher::{ReadinessWatcher, WatcherConfig};
