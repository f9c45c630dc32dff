use std::collections::HashMap;
use std::sync::RwLock;

use recdiff_types::{RecordKind, RecordNumber};

use crate::error::{StoreError, StoreResult};
use crate::record::StoredRecord;
use crate::traits::RecordStore;

/// In-memory, HashMap-based record store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock` and
/// cloned on read/write.
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<(RecordKind, RecordNumber), StoredRecord>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records of both kinds.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Lock(e.to_string())
}

impl RecordStore for InMemoryRecordStore {
    fn fetch(&self, kind: RecordKind, number: RecordNumber) -> StoreResult<Option<StoredRecord>> {
        let map = self.records.read().map_err(poisoned)?;
        Ok(map.get(&(kind, number)).cloned())
    }

    fn put(&self, record: &StoredRecord) -> StoreResult<()> {
        let mut map = self.records.write().map_err(poisoned)?;
        map.insert((record.kind, record.number), record.clone());
        Ok(())
    }

    fn numbers(&self, kind: RecordKind) -> StoreResult<Vec<RecordNumber>> {
        let map = self.records.read().map_err(poisoned)?;
        let mut numbers: Vec<RecordNumber> = map
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .collect();
        numbers.sort();
        Ok(numbers)
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(kind: RecordKind, n: u64, raw: &str) -> StoredRecord {
        StoredRecord::new(kind, RecordNumber(n), raw)
    }

    #[test]
    fn put_then_fetch() {
        let store = InMemoryRecordStore::new();
        store.put(&rec(RecordKind::Test, 1, r#"{"A":"1"}"#)).unwrap();

        let got = store.fetch(RecordKind::Test, RecordNumber(1)).unwrap().unwrap();
        assert_eq!(got.raw_data, r#"{"A":"1"}"#);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn kinds_are_separate_namespaces() {
        let store = InMemoryRecordStore::new();
        store.put(&rec(RecordKind::Test, 1, "{}")).unwrap();

        assert!(store.fetch(RecordKind::Sample, RecordNumber(1)).unwrap().is_none());
    }

    #[test]
    fn require_reports_not_found() {
        let store = InMemoryRecordStore::new();
        let err = store.require(RecordKind::Sample, RecordNumber(77)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: RecordKind::Sample,
                number: RecordNumber(77)
            }
        ));
    }

    #[test]
    fn put_replaces_existing() {
        let store = InMemoryRecordStore::new();
        store.put(&rec(RecordKind::Test, 3, r#"{"A":"1"}"#)).unwrap();
        store.put(&rec(RecordKind::Test, 3, r#"{"A":"2"}"#)).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let got = store.require(RecordKind::Test, RecordNumber(3)).unwrap();
        assert_eq!(got.raw_data, r#"{"A":"2"}"#);
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let store = InMemoryRecordStore::new();
        store.put(&rec(RecordKind::Test, 1, "{}")).unwrap();
        let crashed = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.records.write().unwrap();
                panic!("writer crashed while holding the lock");
            })
            .join()
        });
        assert!(crashed.is_err());

        assert!(matches!(store.len(), Err(StoreError::Lock(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Lock(_))));
        assert!(matches!(
            store.fetch(RecordKind::Test, RecordNumber(1)),
            Err(StoreError::Lock(_))
        ));
    }

    #[test]
    fn numbers_sorted_per_kind() {
        let store = InMemoryRecordStore::new();
        for n in [5, 2, 9] {
            store.put(&rec(RecordKind::Sample, n, "{}")).unwrap();
        }
        store.put(&rec(RecordKind::Test, 1, "{}")).unwrap();

        let numbers = store.numbers(RecordKind::Sample).unwrap();
        assert_eq!(numbers, vec![RecordNumber(2), RecordNumber(5), RecordNumber(9)]);
    }
}
