//! TOML configuration file I/O
//!
//! Handles loading and saving supervisor configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::VpnConfig;
use crate::error::{ConfigError, TunwatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete TOML configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlConfig {
    #[serde(rename = "vpn")]
    vpn_config: VpnConfig,
}

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/tunwatch, or TUNWATCH_CONFIG_DIR if set (used by tests).
pub fn get_config_dir() -> Result<PathBuf, TunwatchError> {
    if let Ok(config_dir) = std::env::var("TUNWATCH_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        TunwatchError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("tunwatch"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, TunwatchError> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Check if a configuration file exists
pub fn config_exists() -> Result<bool, TunwatchError> {
    Ok(get_config_path()?.exists())
}

/// Load configuration from the default TOML file
pub fn load_config() -> Result<VpnConfig, TunwatchError> {
    load_config_from_path(get_config_path()?)
}

/// Load configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<VpnConfig, TunwatchError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TunwatchError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => TunwatchError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {}", e),
        }),
    })?;

    let config: TomlConfig = toml::from_str(&contents).map_err(|e| {
        TunwatchError::Config(ConfigError::ValidationError {
            message: format!("Failed to parse config file: {}", e),
        })
    })?;

    let config = config.vpn_config;
    config
        .validate()
        .map_err(|e| TunwatchError::Config(ConfigError::ValidationError { message: e }))?;

    tracing::debug!(
        openvpn = %config.openvpn_path.display(),
        log = %config.log_path.display(),
        poll_interval_ms = config.poll_interval_ms,
        "Loaded supervisor configuration"
    );

    Ok(config)
}

/// Save configuration to the default TOML file
pub fn save_config(config: &VpnConfig) -> Result<(), TunwatchError> {
    save_config_to_path(config, get_config_path()?)
}

/// Save configuration to a specific TOML file
pub fn save_config_to_path<P: AsRef<Path>>(config: &VpnConfig, path: P) -> Result<(), TunwatchError> {
    // Validate configuration before saving
    config
        .validate()
        .map_err(|e| TunwatchError::Config(ConfigError::ValidationError { message: e }))?;

    // Ensure config directory exists
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TunwatchError::Config(ConfigError::IoError {
                message: format!("Failed to create config directory: {}", e),
            })
        })?;
    }

    let wrapper = TomlConfig {
        vpn_config: config.clone(),
    };
    let contents = toml::to_string_pretty(&wrapper)?;

    std::fs::write(&path, contents).map_err(|_| {
        TunwatchError::Config(ConfigError::SaveFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        })
    })?;

    tracing::info!("Saved supervisor configuration to {:?}", path.as_ref());

    Ok(())
}
