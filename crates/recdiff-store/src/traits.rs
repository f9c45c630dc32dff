use recdiff_types::{RecordKind, RecordNumber};

use crate::error::{StoreError, StoreResult};
use crate::ignored::IgnoredKeys;
use crate::record::StoredRecord;

/// Storage of raw records, addressed by kind and number.
///
/// Implementations must be thread-safe (`Send + Sync`). Records are handed
/// out by value; callers never share a record with the store.
pub trait RecordStore: Send + Sync {
    /// Fetch a record.
    ///
    /// Returns `Ok(None)` if no record of this kind carries `number`.
    fn fetch(&self, kind: RecordKind, number: RecordNumber) -> StoreResult<Option<StoredRecord>>;

    /// Insert or replace a record.
    fn put(&self, record: &StoredRecord) -> StoreResult<()>;

    /// All record numbers of one kind, ascending.
    fn numbers(&self, kind: RecordKind) -> StoreResult<Vec<RecordNumber>>;

    /// Fetch a record, turning absence into [`StoreError::NotFound`].
    fn require(&self, kind: RecordKind, number: RecordNumber) -> StoreResult<StoredRecord> {
        self.fetch(kind, number)?
            .ok_or(StoreError::NotFound { kind, number })
    }
}

/// Source of the keys that always compare as unchanged.
pub trait IgnoredKeySource: Send + Sync {
    fn ignored_keys(&self) -> StoreResult<IgnoredKeys>;
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn fetch(&self, kind: RecordKind, number: RecordNumber) -> StoreResult<Option<StoredRecord>> {
        (**self).fetch(kind, number)
    }

    fn put(&self, record: &StoredRecord) -> StoreResult<()> {
        (**self).put(record)
    }

    fn numbers(&self, kind: RecordKind) -> StoreResult<Vec<RecordNumber>> {
        (**self).numbers(kind)
    }
}

impl<T: IgnoredKeySource + ?Sized> IgnoredKeySource for Box<T> {
    fn ignored_keys(&self) -> StoreResult<IgnoredKeys> {
        (**self).ignored_keys()
    }
}
