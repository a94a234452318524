//! Foreground VPN session command
//!
//! Connects, streams status transitions to the terminal, and disconnects
//! on Ctrl+C or a terminal failure.

use colored::Colorize;
use std::io::Write;
use tunwatch_core::config::toml_config::load_config;
use tunwatch_core::config::VpnConfig;
use tunwatch_core::error::{TunwatchError, VpnError};
use tunwatch_core::types::Credentials;
use tunwatch_core::vpn::{ConnectionEvent, VpnController};

/// Run the connect command
pub fn run_connect() -> Result<(), TunwatchError> {
    let config = load_config()?;
    println!("Loaded configuration for {}", config.config_path.display());

    let username = prompt("VPN username")?;
    let password = prompt("VPN password")?;
    let credentials = Credentials::new(username, password);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_session(config, credentials))
}

async fn run_session(config: VpnConfig, credentials: Credentials) -> Result<(), TunwatchError> {
    let (mut controller, mut events) = VpnController::new(config);

    controller.connect(&credentials).await?;
    if let Some(pid) = controller.pid() {
        println!("OpenVPN running with PID {}", pid);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Interrupt received, disconnecting");
                controller.disconnect().await?;
                println!("{} disconnected", "✓".green());
                return Ok(());
            }

            event = events.recv() => {
                let Some(event) = event else {
                    return Ok(());
                };

                print_event(&event);

                if !event.is_terminal() {
                    continue;
                }

                let _ = controller.disconnect().await;
                let reason = match event {
                    ConnectionEvent::FailedToConnect { detail } => detail,
                    other => other.to_string(),
                };
                return Err(VpnError::ConnectionFailed { reason }.into());
            }
        }
    }
}

fn print_event(event: &ConnectionEvent) {
    match event {
        ConnectionEvent::Connected => println!("{} {}", "✓".green(), event),
        ConnectionEvent::FailedToConnect { detail } => {
            println!("{} {}: {}", "✗".red(), event, detail)
        }
        ConnectionEvent::ProcessKilled => println!("{} {}", "✗".red(), event),
        _ => println!("  {}", event),
    }
}

fn prompt(label: &str) -> Result<String, TunwatchError> {
    print!("{}: ", label);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
