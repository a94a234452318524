//! Configuration module
//!
//! Handles loading and saving supervisor configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod toml_config;

/// Default log marker OpenVPN prints once the tunnel is up
pub const DEFAULT_SUCCESS_MARKER: &str = "Initialization Sequence Completed";

/// VPN supervisor configuration
///
/// Contains all non-sensitive connection parameters. Credentials are
/// supplied per connection attempt and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnConfig {
    /// Path to the OpenVPN executable (bare name is resolved via PATH by the caller)
    pub openvpn_path: PathBuf,

    /// Path to the OpenVPN configuration file (.ovpn)
    pub config_path: PathBuf,

    /// Path where OpenVPN writes its log output
    pub log_path: PathBuf,

    /// Path of the one-shot credential file handed to `--auth-user-pass`
    pub auth_file_path: PathBuf,

    /// Poll interval for the readiness watcher, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Log substring that signals a successfully established tunnel
    #[serde(default = "default_success_marker")]
    pub success_marker: String,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_success_marker() -> String {
    DEFAULT_SUCCESS_MARKER.to_string()
}

impl VpnConfig {
    /// Create a new configuration with default poll interval and marker
    pub fn new(openvpn_path: PathBuf, config_path: PathBuf, log_path: PathBuf, auth_file_path: PathBuf) -> Self {
        Self {
            openvpn_path,
            config_path,
            log_path,
            auth_file_path,
            poll_interval_ms: default_poll_interval_ms(),
            success_marker: default_success_marker(),
        }
    }

    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.openvpn_path.as_os_str().is_empty() {
            return Err("OpenVPN executable path cannot be empty".to_string());
        }

        if self.config_path.as_os_str().is_empty() {
            return Err("OpenVPN config path cannot be empty".to_string());
        }

        if self.log_path.as_os_str().is_empty() {
            return Err("Log path cannot be empty".to_string());
        }

        if self.auth_file_path.as_os_str().is_empty() {
            return Err("Credential file path cannot be empty".to_string());
        }

        // A zero interval would busy-spin the watcher loop
        if self.poll_interval_ms == 0 {
            return Err("Poll interval cannot be zero".to_string());
        }

        if self.poll_interval_ms > 60_000 {
            return Err("Poll interval cannot exceed 60 seconds".to_string());
        }

        if self.success_marker.trim().is_empty() {
            return Err("Success marker cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for VpnConfig {
    fn default() -> Self {
        Self {
            openvpn_path: PathBuf::from("openvpn"),
            config_path: PathBuf::new(),
            log_path: PathBuf::new(),
            auth_file_path: PathBuf::new(),
            poll_interval_ms: default_poll_interval_ms(),
            success_marker: default_success_marker(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> VpnConfig {
        VpnConfig::new(
            PathBuf::from("/usr/sbin/openvpn"),
            PathBuf::from("/etc/openvpn/client.ovpn"),
            PathBuf::from("/var/log/tunwatch/vpn.log"),
            PathBuf::from("/run/tunwatch/auth.txt"),
        )
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_poll_interval_is_one_second() {
        assert_eq!(valid_config().poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = valid_config();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_paths_rejected() {
        let mut config = valid_config();
        config.config_path = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.log_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut config = valid_config();
        config.success_marker = "   ".to_string();
        assert!(config.validate().is_err());
    }
}
