//! tunwatch - OpenVPN connection supervisor
//!
//! A command-line tool that launches an external OpenVPN client, watches
//! its log for the readiness marker, and supervises the process until
//! disconnect.

use clap::{Parser, Subcommand};
use tunwatch_core::{error::TunwatchError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "tunwatch")]
#[command(about = "Supervises an external OpenVPN client connection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the supervisor configuration file
    Setup(cli::setup::SetupArgs),
    /// Connect and supervise the session until failure or Ctrl+C
    Connect,
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup(args) => cli::setup::run_setup(args),
        Commands::Connect => cli::vpn::run_connect(),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration problems (exit code 2)
                TunwatchError::Config(_)
                | TunwatchError::Toml(_)
                | TunwatchError::TomlSerialize(_) => 2,
                // Runtime failures (exit code 1)
                TunwatchError::Vpn(_) | TunwatchError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
