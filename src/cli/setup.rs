//! Supervisor configuration setup command

use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tunwatch_core::config::toml_config::{config_exists, get_config_dir, get_config_path, save_config};
use tunwatch_core::config::{VpnConfig, DEFAULT_SUCCESS_MARKER};
use tunwatch_core::error::{ConfigError, TunwatchError};

/// Arguments for the setup command
#[derive(Args)]
pub struct SetupArgs {
    /// OpenVPN executable, either an absolute path or a name resolved via PATH
    #[arg(long, default_value = "openvpn")]
    pub openvpn: PathBuf,

    /// Path to the OpenVPN client configuration (.ovpn)
    #[arg(long)]
    pub config: PathBuf,

    /// Path where OpenVPN should write its log
    #[arg(long)]
    pub log: PathBuf,

    /// Path for the one-shot credential file (defaults to the config directory)
    #[arg(long)]
    pub auth_file: Option<PathBuf>,

    /// Watcher poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Log marker that signals an established tunnel
    #[arg(long, default_value = DEFAULT_SUCCESS_MARKER)]
    pub marker: String,
}

/// Run the setup command: validate paths and write config.toml
pub fn run_setup(args: SetupArgs) -> Result<(), TunwatchError> {
    let openvpn_path = resolve_openvpn(args.openvpn)?;
    tracing::info!(openvpn = %openvpn_path.display(), "Resolved OpenVPN executable");

    let auth_file_path = match args.auth_file {
        Some(path) => path,
        None => get_config_dir()?.join("auth.txt"),
    };

    let mut config = VpnConfig::new(openvpn_path, args.config, args.log, auth_file_path);
    config.poll_interval_ms = args.poll_interval_ms;
    config.success_marker = args.marker;

    if config_exists()? {
        println!("Replacing existing configuration");
    }
    save_config(&config)?;

    println!(
        "{} Configuration written to {}",
        "✓".green(),
        get_config_path()?.display()
    );
    Ok(())
}

/// Resolve a bare executable name through PATH; pass explicit paths through
fn resolve_openvpn(openvpn: PathBuf) -> Result<PathBuf, TunwatchError> {
    if openvpn.components().count() > 1 {
        return Ok(openvpn);
    }

    which::which(&openvpn).map_err(|_| {
        TunwatchError::Config(ConfigError::ValidationError {
            message: format!("{} not found in PATH", openvpn.display()),
        })
    })
}
