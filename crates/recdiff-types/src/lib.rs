//! Foundation types for recdiff.
//!
//! This crate provides the record model and addressing types shared by every
//! other recdiff crate.
//!
//! # Key Types
//!
//! - [`NestedRecord`] — Ordered tree of named branches, repeated lists, and scalar leaves
//! - [`Scalar`] — A leaf value (null, bool, number, or string)
//! - [`FlatPath`] — Slash-joined address of one leaf inside a record
//! - [`FlatEntry`] — A `(FlatPath, Scalar)` pair produced by flattening
//! - [`RecordKind`] / [`RecordNumber`] — How a stored record is looked up

pub mod error;
pub mod kind;
pub mod path;
pub mod record;
pub mod scalar;

pub use error::TypeError;
pub use kind::{RecordKind, RecordNumber};
pub use path::{FlatEntry, FlatPath, PATH_DELIMITER};
pub use record::NestedRecord;
pub use scalar::Scalar;
