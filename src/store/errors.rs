//! Store error types
//!
//! Validation and duplicate-identifier failures are detected before any
//! write, so they never require rollback. Malformed-record errors are
//! raised on the read path for corrupt or foreign-schema bytes and carry
//! the byte offset of the damaged frame. Storage exhaustion is surfaced
//! verbatim from the filesystem; the store performs no retries.

use std::io;

use thiserror::Error;

use crate::record::RecordId;
use crate::validator::ValidationError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A creation request violated a field bound.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record with this identifier already exists.
    #[error("a record with identifier {0} already exists")]
    DuplicateIdentifier(RecordId),

    /// The log contains bytes that do not parse as a record frame.
    #[error("malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    /// The backing storage ran out of space while appending.
    #[error("storage exhausted while appending record")]
    StorageExhausted,

    /// An underlying storage-layer fault.
    #[error("storage {op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Returns the stable error code for this failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::TopicTooLong(_)) => "CHIRP_TOPIC_TOO_LONG",
            Self::Validation(ValidationError::ContentTooLong(_)) => "CHIRP_CONTENT_TOO_LONG",
            Self::DuplicateIdentifier(_) => "CHIRP_DUPLICATE_IDENTIFIER",
            Self::MalformedRecord { .. } => "CHIRP_DATA_CORRUPTION",
            Self::StorageExhausted => "CHIRP_STORAGE_EXHAUSTED",
            Self::Io { .. } => "CHIRP_STORAGE_IO_ERROR",
        }
    }

    /// Whether this failure was rejected before anything was written.
    ///
    /// Rejected requests need no rollback; the store was never touched.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DuplicateIdentifier(_))
    }

    /// Builds a malformed-record error for the frame at `offset`.
    pub fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// Wraps an I/O fault, distinguishing storage exhaustion.
    pub fn io(op: &'static str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => Self::StorageExhausted,
            _ => Self::Io { op, source },
        }
    }
}
