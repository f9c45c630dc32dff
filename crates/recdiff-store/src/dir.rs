//! Directory-backed record store.
//!
//! Layout: `<root>/test/<number>.json` and `<root>/sample/<number>.json`.
//! Each file holds the raw JSON encoding of one record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use recdiff_types::{RecordKind, RecordNumber};

use crate::error::StoreResult;
use crate::record::StoredRecord;
use crate::traits::RecordStore;

/// A [`RecordStore`] over a directory tree of JSON files.
#[derive(Clone, Debug)]
pub struct DirRecordStore {
    root: PathBuf,
}

impl DirRecordStore {
    /// Open a store rooted at `root`. Kind directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    fn record_path(&self, kind: RecordKind, number: RecordNumber) -> PathBuf {
        self.kind_dir(kind).join(format!("{number}.json"))
    }
}

impl RecordStore for DirRecordStore {
    fn fetch(&self, kind: RecordKind, number: RecordNumber) -> StoreResult<Option<StoredRecord>> {
        let path = self.record_path(kind, number);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(path = %path.display(), bytes = raw.len(), "read record");
                Ok(Some(StoredRecord::new(kind, number, raw)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, record: &StoredRecord) -> StoreResult<()> {
        fs::create_dir_all(self.kind_dir(record.kind))?;
        fs::write(self.record_path(record.kind, record.number), &record.raw_data)?;
        Ok(())
    }

    fn numbers(&self, kind: RecordKind) -> StoreResult<Vec<RecordNumber>> {
        let dir = self.kind_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut numbers = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<RecordNumber>) {
                Some(Ok(n)) => numbers.push(n),
                _ => warn!("skipping unrecognised record file {:?}", path),
            }
        }
        numbers.sort();
        Ok(numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirRecordStore::new(dir.path());
        let rec = StoredRecord::new(RecordKind::Test, RecordNumber(12), r#"{"N_ZAP":12}"#);
        store.put(&rec).unwrap();

        assert!(dir.path().join("test").join("12.json").exists());
        let got = store.require(RecordKind::Test, RecordNumber(12)).unwrap();
        assert_eq!(got, rec);
    }

    #[test]
    fn missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirRecordStore::new(dir.path());
        assert!(store.fetch(RecordKind::Sample, RecordNumber(1)).unwrap().is_none());
        assert!(matches!(
            store.require(RecordKind::Sample, RecordNumber(1)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn numbers_ignore_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirRecordStore::new(dir.path());
        for n in [3, 1] {
            store
                .put(&StoredRecord::new(RecordKind::Sample, RecordNumber(n), "{}"))
                .unwrap();
        }
        fs::write(dir.path().join("sample").join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("sample").join("draft.json"), "{}").unwrap();

        let numbers = store.numbers(RecordKind::Sample).unwrap();
        assert_eq!(numbers, vec![RecordNumber(1), RecordNumber(3)]);
        assert!(store.numbers(RecordKind::Test).unwrap().is_empty());
    }
}
