//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use secrecy::{ExposeSecret, Secret};

/// Wrapper for the VPN account password
///
/// Ensures the password is never accidentally logged or exposed in debug
/// output, even though it eventually ends up in the one-shot credential
/// file handed to OpenVPN.
#[derive(Clone, Debug)]
pub struct Password(Secret<String>);

impl Password {
    /// Create a new Password from a plain string
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// This should only be called when writing the credential file
    /// for OpenVPN's `--auth-user-pass` option.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

/// Credentials for one VPN connection attempt
///
/// The username is not treated as secret; the password is.
#[derive(Clone, Debug)]
pub struct Credentials {
    username: String,
    password: Password,
}

impl Credentials {
    /// Create credentials from a username and plain password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Password::new(password.into()),
        }
    }

    /// The account username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Render the two-line `--auth-user-pass` file body OpenVPN expects
    pub fn auth_file_contents(&self) -> String {
        format!("{}\n{}\n", self.username, self.password.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_not_in_debug_output() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("alice"));
    }

    #[test]
    fn test_auth_file_contents_layout() {
        let creds = Credentials::new("alice", "hunter2");
        assert_eq!(creds.auth_file_contents(), "alice\nhunter2\n");
    }
}
