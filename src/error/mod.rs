//! Error types and handling for packsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Fetch errors keep their status class visible because the sync executor's
//! retry policy depends on it: server errors and timeouts are transient,
//! client errors are terminal. Front matter parse failures are deliberately
//! absent from this taxonomy; the scanner degrades them to defaults.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for packsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum PacksyncError {
    // Scan errors
    #[error("Cannot read directory '{path}': {reason}")]
    #[diagnostic(
        code(packsync::scan::unreadable_directory),
        help("Check that the directory exists and you have permission to read it")
    )]
    DirectoryUnreadable { path: String, reason: String },

    // Registry and configuration errors
    #[error("Failed to parse registry: {reason}")]
    #[diagnostic(
        code(packsync::registry::parse_failed),
        help("Check that the registry file is valid JSON matching the registry schema")
    )]
    RegistryParse { reason: String },

    #[error("Registry file '{path}' not found")]
    #[diagnostic(
        code(packsync::registry::not_found),
        help("Check the registry path or run `packsync scan` to bootstrap one")
    )]
    RegistryNotFound { path: String },

    #[error("Failed to read config '{path}': {reason}")]
    #[diagnostic(code(packsync::config::read_failed))]
    ConfigRead { path: String, reason: String },

    #[error("Failed to parse config: {reason}")]
    #[diagnostic(
        code(packsync::config::parse_failed),
        help("The config document must be a JSON object with optional `ui` and `install` sections")
    )]
    ConfigParse { reason: String },

    // Fetch errors
    #[error("Content not found at '{path}'")]
    #[diagnostic(
        code(packsync::fetch::not_found),
        help("The item's source path no longer exists in the content source")
    )]
    FetchNotFound { path: String },

    #[error("Server error fetching '{path}' (status {status})")]
    #[diagnostic(code(packsync::fetch::server_error))]
    FetchServer { path: String, status: u16 },

    #[error("Timed out fetching '{path}'")]
    #[diagnostic(code(packsync::fetch::timeout))]
    FetchTimeout { path: String },

    #[error("Network error fetching '{path}': {reason}")]
    #[diagnostic(code(packsync::fetch::network))]
    FetchNetwork { path: String, reason: String },

    #[error("Giving up on '{path}' after {attempts} attempts")]
    #[diagnostic(
        code(packsync::fetch::retry_exhausted),
        help("The content source kept returning transient errors; try again later")
    )]
    RetryExhausted { path: String, attempts: u32 },

    // File system errors
    #[error("Failed to write '{path}': {reason}")]
    #[diagnostic(code(packsync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to remove '{path}': {reason}")]
    #[diagnostic(code(packsync::fs::remove_failed))]
    FileRemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(packsync::fs::io))]
    IoError { message: String },
}

impl PacksyncError {
    /// True for failures the sync executor is allowed to retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PacksyncError::FetchServer { .. } | PacksyncError::FetchTimeout { .. }
        )
    }
}

/// Result type alias for packsync operations
pub type Result<T> = std::result::Result<T, PacksyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(
            PacksyncError::FetchServer {
                path: "a/b.md".into(),
                status: 503
            }
            .is_transient()
        );
        assert!(
            PacksyncError::FetchTimeout {
                path: "a/b.md".into()
            }
            .is_transient()
        );
        assert!(
            !PacksyncError::FetchNotFound {
                path: "a/b.md".into()
            }
            .is_transient()
        );
        assert!(
            !PacksyncError::FetchNetwork {
                path: "a/b.md".into(),
                reason: "dns".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_error_display() {
        let err = PacksyncError::RetryExhausted {
            path: "agents/finder.md".into(),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "Giving up on 'agents/finder.md' after 3 attempts"
        );
    }
}
