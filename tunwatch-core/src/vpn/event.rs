//! Connection lifecycle events
//!
//! Typed transition messages delivered in order over a channel, one per
//! transition. The Display form is the human-readable status message.

/// Events emitted during the connection lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Connection attempt started, child process being launched
    Connecting,

    /// Watcher started polling the log file
    CheckingLogs,

    /// Readiness marker observed, tunnel established
    Connected,

    /// Session torn down on user request
    Disconnected,

    /// Process died or the log showed a fatal line before readiness
    FailedToConnect { detail: String },

    /// Process disappeared after the connection was established
    ProcessKilled,
}

impl ConnectionEvent {
    /// Whether this event ends the connection attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectionEvent::Disconnected
                | ConnectionEvent::FailedToConnect { .. }
                | ConnectionEvent::ProcessKilled
        )
    }
}

impl std::fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionEvent::Connecting => write!(f, "connecting"),
            ConnectionEvent::CheckingLogs => write!(f, "checking logs"),
            ConnectionEvent::Connected => write!(f, "connected"),
            ConnectionEvent::Disconnected => write!(f, "disconnected"),
            ConnectionEvent::FailedToConnect { .. } => write!(f, "failed to connect"),
            ConnectionEvent::ProcessKilled => write!(f, "process killed"),
        }
    }
}
