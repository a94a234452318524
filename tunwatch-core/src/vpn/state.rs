//! VPN connection state
//!
//! Defines the state machine for the connection lifecycle. The watcher owns
//! readiness/failure transitions; the controller owns lifecycle start/stop.

/// VPN connection states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected
    #[default]
    Disconnected,

    /// Child process launched, waiting for the readiness marker
    Connecting,

    /// Readiness marker observed in the log
    Connected,

    /// Connection attempt failed or the process died
    Failed(String),
}

impl ConnectionState {
    /// Check if this state represents an established connection
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Check if a connection attempt is in flight
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }

    /// Check if the last attempt failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ConnectionState::Failed(_))
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}
