use recdiff_types::{RecordKind, RecordNumber};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record of this kind carries this number.
    #[error("no {kind} record with number {number}")]
    NotFound {
        kind: RecordKind,
        number: RecordNumber,
    },

    /// The raw record encoding could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
