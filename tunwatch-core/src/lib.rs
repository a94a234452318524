//! Core library for the tunwatch OpenVPN connection supervisor
//!
//! This crate provides process lifecycle supervision for an external OpenVPN
//! client, log-based readiness detection, and the connect/disconnect
//! orchestration that ties the two together.

pub mod error;
pub mod types;

pub mod config;
pub mod vpn;

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging for production use.
/// In development, logs to stderr with appropriate formatting.
/// Verbosity is controlled through the `TUNWATCH_LOG` environment variable.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env("TUNWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to use systemd journal logging if available
    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            // We're running under systemd, use journal logging
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(filter)
                .init();
            return Ok(());
        }
    }

    // Fallback to stderr logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}
