//! CLI-specific error types
//!
//! Errors reaching main are printed to stderr with a non-zero exit.
//! Request-level store rejections are reported as JSON error envelopes
//! on stdout instead (see `commands`).

use std::io;

use thiserror::Error;

use crate::identity::ParseAuthorIdError;
use crate::store::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing or invalid.
    #[error("[CHIRP_CLI_CONFIG_ERROR] {0}")]
    Config(String),

    /// stdin/stdout/file I/O failure.
    #[error("[CHIRP_CLI_IO_ERROR] {0}")]
    Io(#[from] io::Error),

    /// The data directory already holds a record log.
    #[error("[CHIRP_CLI_ALREADY_INITIALIZED] {0}")]
    AlreadyInitialized(String),

    /// The data directory has not been initialized.
    #[error("[CHIRP_CLI_NOT_INITIALIZED] {0}")]
    NotInitialized(String),

    /// An author handle failed to parse.
    #[error("[CHIRP_CLI_BAD_AUTHOR] {0}")]
    BadAuthor(#[from] ParseAuthorIdError),

    /// A raw predicate argument failed to parse.
    #[error("[CHIRP_CLI_BAD_PREDICATE] {0}")]
    BadPredicate(String),

    /// A store-layer failure (corruption, exhaustion, I/O).
    #[error("[{code}] {err}", code = .0.code(), err = .0)]
    Store(#[from] StoreError),
}

impl CliError {
    /// Config error constructor.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_carries_code() {
        let err: CliError = StoreError::StorageExhausted.into();
        let display = err.to_string();
        assert!(display.contains("CHIRP_STORAGE_EXHAUSTED"));
    }

    #[test]
    fn test_config_error_display() {
        let err = CliError::config("missing data_dir");
        assert!(err.to_string().contains("CHIRP_CLI_CONFIG_ERROR"));
        assert!(err.to_string().contains("missing data_dir"));
    }
}
