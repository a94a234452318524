//! Pattern-based scanner for the OpenVPN log file
//!
//! Derives readiness and fatal-failure verdicts from accumulated log content.

use regex::Regex;
use std::path::Path;

/// Outcome of scanning the log content accumulated so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogVerdict {
    /// Nothing conclusive yet, keep polling
    Pending,

    /// Success marker present, tunnel is up
    Ready,

    /// Fatal line present, the attempt cannot succeed
    Fatal { line: String },
}

/// Scanner for OpenVPN log content
pub struct LogScanner {
    success_marker: String,
    fatal_pattern: Regex,
}

impl LogScanner {
    /// Create a scanner for the given success marker
    pub fn new(success_marker: &str) -> Self {
        Self {
            success_marker: success_marker.to_string(),
            fatal_pattern: Regex::new(
                r"AUTH_FAILED|Exiting due to fatal error|Cannot (?:open|allocate) TUN/TAP",
            )
            .expect("Failed to compile fatal pattern"),
        }
    }

    /// Scan log content for the success marker or a fatal line
    ///
    /// Lines are inspected in file order and the first conclusive line wins,
    /// so a marker printed after a transient error still counts as ready.
    pub fn scan(&self, content: &str) -> LogVerdict {
        for line in content.lines() {
            if line.contains(&self.success_marker) {
                return LogVerdict::Ready;
            }
            if self.fatal_pattern.is_match(line) {
                return LogVerdict::Fatal {
                    line: line.trim().to_string(),
                };
            }
        }
        LogVerdict::Pending
    }
}

/// Read the log file, treating a missing or unreadable file as empty
///
/// OpenVPN creates the log some time after spawn; read errors are never
/// surfaced, only treated as "no new content".
pub async fn read_log(path: &Path) -> String {
    tokio::fs::read_to_string(path).await.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SUCCESS_MARKER;

    fn scanner() -> LogScanner {
        LogScanner::new(DEFAULT_SUCCESS_MARKER)
    }

    #[test]
    fn test_empty_content_is_pending() {
        assert_eq!(scanner().scan(""), LogVerdict::Pending);
    }

    #[test]
    fn test_marker_detected() {
        let content = "TUN/TAP device tun0 opened\n\
                       Initialization Sequence Completed\n";
        assert_eq!(scanner().scan(content), LogVerdict::Ready);
    }

    #[test]
    fn test_marker_detected_mid_line() {
        let content = "2024-01-01 12:00:00 Initialization Sequence Completed\n";
        assert_eq!(scanner().scan(content), LogVerdict::Ready);
    }

    #[test]
    fn test_auth_failure_detected() {
        let content = "AUTH: Received control message: AUTH_FAILED\n";
        match scanner().scan(content) {
            LogVerdict::Fatal { line } => assert!(line.contains("AUTH_FAILED")),
            other => panic!("Expected Fatal, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_wins_when_it_appears_first() {
        let content = "Initialization Sequence Completed\n\
                       Exiting due to fatal error\n";
        assert_eq!(scanner().scan(content), LogVerdict::Ready);
    }

    #[test]
    fn test_unrelated_noise_is_pending() {
        let content = "OpenVPN 2.6 linux-x86_64\nUDPv4 link remote: 203.0.113.1:1194\n";
        assert_eq!(scanner().scan(content), LogVerdict::Pending);
    }

    #[tokio::test]
    async fn test_read_log_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let content = read_log(&dir.path().join("does-not-exist.log")).await;
        assert_eq!(content, "");
    }
}
