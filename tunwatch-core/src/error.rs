//! Error types for the tunwatch connection supervisor
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the tunwatch application
#[derive(Error, Debug)]
pub enum TunwatchError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to VPN process supervision
    #[error("VPN error: {0}")]
    Vpn(#[from] VpnError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// VPN supervision errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VpnError {
    #[error("OpenVPN executable not found: {path}")]
    ExecutableNotFound { path: String },

    #[error("Failed to launch OpenVPN process: {reason}")]
    LaunchFailed { reason: String },

    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("No active VPN session")]
    NotConnected,

    #[error("Failed to write credential file: {reason}")]
    CredentialWriteFailed { reason: String },

    #[error("Failed to terminate OpenVPN process: {reason}")]
    TerminationFailed { reason: String },

    #[error("Process did not respond to signals")]
    UnresponsiveProcess,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TunwatchError>;
