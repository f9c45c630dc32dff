//! Record flattening: nested tree to ordered `(path, value)` entries.
//!
//! Traversal is depth-first pre-order over children in stored order. List
//! items are addressed by their decimal index. Empty branches and lists
//! contribute no entries.

use recdiff_types::path::validate_segment;
use recdiff_types::{FlatEntry, FlatPath, NestedRecord, PATH_DELIMITER};

use crate::error::{DiffError, DiffResult};

/// Flatten a record into its leaves, in traversal order.
///
/// Fails with [`DiffError::PathEncodingConflict`] if any key is empty or
/// contains the path delimiter, and with [`DiffError::ScalarRoot`] if the
/// record itself is a scalar.
pub fn flatten(record: &NestedRecord) -> DiffResult<Vec<FlatEntry>> {
    if let NestedRecord::Leaf(_) = record {
        return Err(DiffError::ScalarRoot);
    }
    let mut entries = Vec::with_capacity(record.leaf_count());
    let mut prefix = Vec::new();
    flatten_node(record, &mut prefix, &mut entries)?;
    Ok(entries)
}

fn flatten_node(
    node: &NestedRecord,
    prefix: &mut Vec<String>,
    out: &mut Vec<FlatEntry>,
) -> DiffResult<()> {
    match node {
        NestedRecord::Leaf(value) => {
            let path = FlatPath::new(prefix.iter().cloned()).map_err(|_| conflict("", prefix))?;
            out.push(FlatEntry::new(path, value.clone()));
        }
        NestedRecord::Branch(children) => {
            for (key, child) in children {
                validate_segment(key).map_err(|_| conflict(key, prefix))?;
                prefix.push(key.clone());
                flatten_node(child, prefix, out)?;
                prefix.pop();
            }
        }
        NestedRecord::List(items) => {
            for (index, item) in items.iter().enumerate() {
                prefix.push(index.to_string());
                flatten_node(item, prefix, out)?;
                prefix.pop();
            }
        }
    }
    Ok(())
}

fn conflict(segment: &str, prefix: &[String]) -> DiffError {
    DiffError::PathEncodingConflict {
        segment: segment.to_string(),
        parent: prefix.join(&PATH_DELIMITER.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recdiff_types::Scalar;

    fn paths(entries: &[FlatEntry]) -> Vec<String> {
        entries.iter().map(|e| e.path.to_string()).collect()
    }

    #[test]
    fn depth_first_in_stored_order() {
        let record = NestedRecord::from_json_str(
            r#"{"Z": "1", "A": {"Y": "2", "B": {"C": "3"}, "X": "4"}, "M": "5"}"#,
        )
        .unwrap();

        let entries = flatten(&record).unwrap();
        assert_eq!(paths(&entries), ["Z", "A/Y", "A/B/C", "A/X", "M"]);
        assert_eq!(entries[2].value, Scalar::from("3"));
    }

    #[test]
    fn lists_use_index_segments() {
        let record = NestedRecord::from_json_str(
            r#"{"USL": [{"CODE": "a"}, {"CODE": "b", "QTY": 2}]}"#,
        )
        .unwrap();

        let entries = flatten(&record).unwrap();
        assert_eq!(paths(&entries), ["USL/0/CODE", "USL/1/CODE", "USL/1/QTY"]);
    }

    #[test]
    fn empty_containers_contribute_nothing() {
        let record = NestedRecord::from_json_str(r#"{"A": {}, "B": [], "C": [{}], "D": null}"#).unwrap();
        let entries = flatten(&record).unwrap();
        assert_eq!(paths(&entries), ["D"]);
        assert_eq!(entries[0].value, Scalar::Null);
    }

    #[test]
    fn empty_record_flattens_to_nothing() {
        assert!(flatten(&NestedRecord::empty()).unwrap().is_empty());
    }

    #[test]
    fn delimiter_in_key_is_a_conflict() {
        let record = NestedRecord::from_json_str(r#"{"A": {"B/C": "1"}}"#).unwrap();
        match flatten(&record) {
            Err(DiffError::PathEncodingConflict { segment, parent }) => {
                assert_eq!(segment, "B/C");
                assert_eq!(parent, "A");
            }
            other => panic!("expected PathEncodingConflict, got {other:?}"),
        }
    }

    #[test]
    fn empty_key_is_a_conflict() {
        let record = NestedRecord::from_json_str(r#"{"": "1"}"#).unwrap();
        assert!(matches!(
            flatten(&record),
            Err(DiffError::PathEncodingConflict { .. })
        ));
    }

    #[test]
    fn scalar_root_rejected() {
        assert!(matches!(
            flatten(&NestedRecord::leaf("x")),
            Err(DiffError::ScalarRoot)
        ));
    }
}
