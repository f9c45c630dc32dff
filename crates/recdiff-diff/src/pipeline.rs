//! End-to-end comparison: align, flatten, merge, annotate, render.
//!
//! Every stage is a pure function of its inputs, so independent comparisons
//! can run in parallel without coordination. Within one comparison the
//! stages run in order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use recdiff_store::{IgnoredKeySource, IgnoredKeys, RecordStore, StoreError};
use recdiff_types::{NestedRecord, RecordKind, RecordNumber};

use crate::align::align_services;
use crate::annotate::{build_tree, AnnotatedTree, Side};
use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::flatten::flatten;
use crate::merge::{merge_lines, DiffLineSequence};
use crate::render::render_markup;

/// The result of comparing a test record against a sample record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub lines: DiffLineSequence,
    /// Test values, annotated.
    pub test_tree: AnnotatedTree,
    /// Sample values, annotated with the same classifications.
    pub sample_tree: AnnotatedTree,
}

impl Comparison {
    /// Render both views.
    pub fn render(&self) -> RenderedViews {
        RenderedViews {
            test: render_markup(&self.test_tree),
            sample: render_markup(&self.sample_tree),
        }
    }
}

/// Markup fragments for side-by-side display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedViews {
    pub test: String,
    pub sample: String,
}

/// Compare two decoded records.
pub fn compare_records(
    test: &NestedRecord,
    sample: &NestedRecord,
    ignored: &IgnoredKeys,
    config: &DiffConfig,
) -> DiffResult<Comparison> {
    let sample = align_services(test, sample, config);

    let test_entries = flatten(test)?;
    let sample_entries = flatten(&sample)?;
    debug!(
        test = test_entries.len(),
        sample = sample_entries.len(),
        "flattened records"
    );

    let lines = merge_lines(&test_entries, &sample_entries, ignored);
    let test_tree = build_tree(&lines, Side::Test);
    let sample_tree = build_tree(&lines, Side::Sample);

    Ok(Comparison {
        lines,
        test_tree,
        sample_tree,
    })
}

/// Compares stored records looked up by number.
pub struct Comparator<S, I> {
    store: S,
    ignored: I,
    config: DiffConfig,
}

impl<S: RecordStore, I: IgnoredKeySource> Comparator<S, I> {
    /// Create a comparator with the default configuration.
    pub fn new(store: S, ignored: I) -> Self {
        Self::with_config(store, ignored, DiffConfig::default())
    }

    pub fn with_config(store: S, ignored: I, config: DiffConfig) -> Self {
        Self {
            store,
            ignored,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Fetch and decode one record.
    pub fn load(&self, kind: RecordKind, number: RecordNumber) -> DiffResult<NestedRecord> {
        let stored = self.store.require(kind, number)?;
        stored.decode().map_err(|e| match e {
            StoreError::Decode(reason) => DiffError::DecodeFailure {
                kind,
                number,
                reason,
            },
            other => DiffError::from(other),
        })
    }

    /// The ignored keys, or an empty set if the source is unavailable.
    pub fn ignored_keys(&self) -> IgnoredKeys {
        match self.ignored.ignored_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "ignored keys unavailable, comparing without them");
                IgnoredKeys::new()
            }
        }
    }

    /// Run the full comparison of test record `test` against sample record `sample`.
    pub fn compare(&self, test: RecordNumber, sample: RecordNumber) -> DiffResult<Comparison> {
        let test_record = self.load(RecordKind::Test, test)?;
        let sample_record = self.load(RecordKind::Sample, sample)?;
        let ignored = self.ignored_keys();

        let comparison = compare_records(&test_record, &sample_record, &ignored, &self.config)?;
        let summary = comparison.lines.summary();
        info!(
            %test,
            %sample,
            changed = summary.changed,
            added = summary.added,
            deleted = summary.deleted,
            "compared records"
        );
        Ok(comparison)
    }

    /// The classified line sequence only.
    pub fn lines(&self, test: RecordNumber, sample: RecordNumber) -> DiffResult<DiffLineSequence> {
        self.compare(test, sample).map(|c| c.lines)
    }

    /// Both rendered views.
    pub fn views(&self, test: RecordNumber, sample: RecordNumber) -> DiffResult<RenderedViews> {
        self.compare(test, sample).map(|c| c.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::Classification;
    use recdiff_store::{FileIgnoredKeys, InMemoryRecordStore, StaticIgnoredKeys, StoredRecord};

    const TEST_RECORD: &str = r#"{
        "N_ZAP": "1",
        "PACIENT": {"NPOLIS": "7700001", "VPOLIS": "3"},
        "Z_SL": {
            "IDCASE": "501",
            "DATE_1": "2019-03-01",
            "SL": {
                "DS1": "J06.9",
                "USL": [
                    {"IDSERV": "1", "DATE_IN": "2019-03-01", "CODE_USL": "B01.047.001", "TARIF": "100"},
                    {"IDSERV": "2", "DATE_IN": "2019-03-02", "CODE_USL": "A09.05.023", "TARIF": "50"}
                ]
            }
        }
    }"#;

    const SAMPLE_RECORD: &str = r#"{
        "N_ZAP": "1",
        "PACIENT": {"NPOLIS": "7700001", "VPOLIS": "3"},
        "Z_SL": {
            "IDCASE": "777",
            "DATE_1": "2019-03-01",
            "SL": {
                "DS1": "J06.8",
                "USL": [
                    {"IDSERV": "8", "DATE_IN": "2019-03-02", "CODE_USL": "A09.05.023", "TARIF": "50"},
                    {"IDSERV": "9", "DATE_IN": "2019-03-01", "CODE_USL": "B01.047.001", "TARIF": "120"}
                ]
            }
        }
    }"#;

    fn store() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        store
            .put(&StoredRecord::new(RecordKind::Test, RecordNumber(1), TEST_RECORD))
            .unwrap();
        store
            .put(&StoredRecord::new(RecordKind::Sample, RecordNumber(1), SAMPLE_RECORD))
            .unwrap();
        store
    }

    fn ignoring(keys: &[&str]) -> StaticIgnoredKeys {
        StaticIgnoredKeys(keys.iter().copied().collect())
    }

    fn classification_of(lines: &DiffLineSequence, path: &str) -> Classification {
        lines
            .iter()
            .find(|l| l.path.to_string() == path)
            .map(|l| l.classification)
            .unwrap()
    }

    #[test]
    fn aligned_services_compare_field_by_field() {
        let comparator = Comparator::new(store(), ignoring(&["IDCASE", "IDSERV"]));
        let lines = comparator.lines(RecordNumber(1), RecordNumber(1)).unwrap();

        assert_eq!(classification_of(&lines, "Z_SL/IDCASE"), Classification::Unchanged);
        assert_eq!(classification_of(&lines, "Z_SL/SL/DS1"), Classification::Changed);
        assert_eq!(
            classification_of(&lines, "Z_SL/SL/USL/0/CODE_USL"),
            Classification::Unchanged
        );
        assert_eq!(classification_of(&lines, "Z_SL/SL/USL/0/TARIF"), Classification::Changed);
        assert_eq!(classification_of(&lines, "Z_SL/SL/USL/1/TARIF"), Classification::Unchanged);
        assert_eq!(lines.count(Classification::Changed), 2);
        assert_eq!(lines.count(Classification::Added), 0);
        assert_eq!(lines.count(Classification::Deleted), 0);
    }

    #[test]
    fn unaligned_services_report_more_changes() {
        let comparator = Comparator::with_config(
            store(),
            ignoring(&["IDCASE", "IDSERV"]),
            DiffConfig::unaligned(),
        );
        let lines = comparator.lines(RecordNumber(1), RecordNumber(1)).unwrap();
        assert!(lines.count(Classification::Changed) > 2);
    }

    #[test]
    fn missing_record_is_not_found() {
        let comparator = Comparator::new(store(), StaticIgnoredKeys::default());
        let err = comparator.compare(RecordNumber(1), RecordNumber(2)).unwrap_err();
        assert!(matches!(
            err,
            DiffError::RecordNotFound {
                kind: RecordKind::Sample,
                number: RecordNumber(2)
            }
        ));
    }

    #[test]
    fn undecodable_record_is_a_decode_failure() {
        let store = store();
        store
            .put(&StoredRecord::new(RecordKind::Test, RecordNumber(3), "{\"N_ZAP\": "))
            .unwrap();
        let comparator = Comparator::new(store, StaticIgnoredKeys::default());
        let err = comparator.compare(RecordNumber(3), RecordNumber(1)).unwrap_err();
        assert!(matches!(
            err,
            DiffError::DecodeFailure {
                kind: RecordKind::Test,
                number: RecordNumber(3),
                ..
            }
        ));
    }

    #[test]
    fn unavailable_ignored_keys_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let comparator = Comparator::new(store(), FileIgnoredKeys::new(dir.path().join("missing")));
        assert!(comparator.ignored_keys().is_empty());

        let lines = comparator.lines(RecordNumber(1), RecordNumber(1)).unwrap();
        assert_eq!(classification_of(&lines, "Z_SL/IDCASE"), Classification::Changed);
    }

    #[test]
    fn views_align_row_for_row() {
        let comparator = Comparator::new(store(), StaticIgnoredKeys::default());
        let comparison = comparator.compare(RecordNumber(1), RecordNumber(1)).unwrap();
        assert_eq!(comparison.test_tree.leaf_rows(), comparison.sample_tree.leaf_rows());

        let views = comparison.render();
        let rows = |html: &str| html.matches("<div class='tag").count();
        assert_eq!(rows(&views.test), rows(&views.sample));
        assert!(views.test.contains("J06.9"));
        assert!(views.sample.contains("J06.8"));
        assert!(!views.test.contains("J06.8"));
    }

    #[test]
    fn compare_records_scenario() {
        let test = NestedRecord::from_json_str(r#"{"A": "1", "B": "2"}"#).unwrap();
        let sample = NestedRecord::from_json_str(r#"{"A": "1", "C": "3"}"#).unwrap();
        let comparison =
            compare_records(&test, &sample, &IgnoredKeys::new(), &DiffConfig::default()).unwrap();

        let shape: Vec<(Classification, String)> = comparison
            .lines
            .iter()
            .map(|l| (l.classification, l.path.to_string()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Classification::Unchanged, "A".to_string()),
                (Classification::Added, "B".to_string()),
                (Classification::Deleted, "C".to_string()),
            ]
        );
    }

    #[test]
    fn path_conflict_surfaces() {
        let test = NestedRecord::from_json_str(r#"{"A/B": "1"}"#).unwrap();
        let sample = NestedRecord::empty();
        let err = compare_records(&test, &sample, &IgnoredKeys::new(), &DiffConfig::default())
            .unwrap_err();
        assert!(matches!(err, DiffError::PathEncodingConflict { .. }));
    }
}
