//! Record retrieval for recdiff.
//!
//! The comparison engine never touches persistence directly. It asks a
//! [`RecordStore`] for a record by kind and number, and an
//! [`IgnoredKeySource`] for the keys that always compare equal.
//!
//! # Backends
//!
//! - [`InMemoryRecordStore`] -- `HashMap`-based store for tests and embedding
//! - [`DirRecordStore`] -- one JSON file per record under `<root>/<kind>/<number>.json`
//! - [`StaticIgnoredKeys`] / [`FileIgnoredKeys`] -- ignored-key sources
//!
//! # Design Rules
//!
//! 1. Stores hand out raw encodings; decoding happens in [`StoredRecord::decode`].
//! 2. A missing record is `Ok(None)` from [`RecordStore::fetch`] and
//!    [`StoreError::NotFound`] from [`RecordStore::require`].
//! 3. All I/O errors are propagated, never silently ignored.

pub mod dir;
pub mod error;
pub mod ignored;
pub mod memory;
pub mod record;
pub mod traits;

pub use dir::DirRecordStore;
pub use error::{StoreError, StoreResult};
pub use ignored::{FileIgnoredKeys, IgnoredKeys, StaticIgnoredKeys};
pub use memory::InMemoryRecordStore;
pub use record::{RecordSummary, StoredRecord};
pub use traits::{IgnoredKeySource, RecordStore};
