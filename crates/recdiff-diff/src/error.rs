//! Error types for the diff crate.

use recdiff_store::StoreError;
use recdiff_types::{RecordKind, RecordNumber};

/// Errors that can occur while comparing records.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// No record of this kind carries this number.
    #[error("no {kind} record with number {number}")]
    RecordNotFound {
        kind: RecordKind,
        number: RecordNumber,
    },

    /// The stored encoding of a record could not be decoded.
    #[error("cannot decode {kind} record {number}: {reason}")]
    DecodeFailure {
        kind: RecordKind,
        number: RecordNumber,
        reason: String,
    },

    /// A key cannot be used as a path segment (empty, or contains '/').
    #[error("key {segment:?} under {parent:?} cannot be encoded as a path segment")]
    PathEncodingConflict { segment: String, parent: String },

    /// The record is a bare scalar, so its value has no path.
    #[error("record root is a scalar, expected a branch")]
    ScalarRoot,

    /// The diff configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DiffError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, number } => Self::RecordNotFound { kind, number },
            other => Self::Store(other),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
