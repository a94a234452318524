//! CLI command implementations

pub mod setup;
pub mod vpn;
