use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("path must have at least one segment")]
    EmptyPath,

    #[error("path segment must not be empty")]
    EmptySegment,

    #[error("path segment {segment:?} contains the '/' delimiter")]
    DelimiterInSegment { segment: String },

    #[error("unknown record kind: {0}")]
    UnknownKind(String),
}
