//! Stored records as handed out by a [`RecordStore`](crate::RecordStore).

use serde::{Deserialize, Serialize};
use tracing::debug;

use recdiff_types::{NestedRecord, RecordKind, RecordNumber, Scalar};

use crate::error::{StoreError, StoreResult};

/// Indexed header fields of a record, used for listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// The record's own number (`N_ZAP`).
    pub record_number: Option<RecordNumber>,
    /// Insurance policy number (`NPOLIS`).
    pub policy_number: Option<String>,
    /// Start date of the first case (`DATE_1`).
    pub start_date: Option<String>,
    /// Primary diagnosis code (`DS1`).
    pub diagnosis: Option<String>,
}

impl RecordSummary {
    /// Extract the header fields from a decoded record.
    pub fn from_record(record: &NestedRecord) -> Self {
        let text = |key: &str| {
            record
                .find_leaf(key)
                .filter(|s| !s.is_blank())
                .map(|s: &Scalar| s.as_text().into_owned())
        };
        Self {
            record_number: text("N_ZAP").and_then(|n| n.parse().ok()),
            policy_number: text("NPOLIS"),
            start_date: text("DATE_1"),
            diagnosis: text("DS1"),
        }
    }
}

/// A record in its persisted form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub kind: RecordKind,
    pub number: RecordNumber,
    /// The raw JSON encoding.
    pub raw_data: String,
    pub summary: RecordSummary,
}

impl StoredRecord {
    /// Wrap a raw encoding. The summary is filled when the data decodes.
    pub fn new(kind: RecordKind, number: RecordNumber, raw_data: impl Into<String>) -> Self {
        let raw_data = raw_data.into();
        let summary = NestedRecord::from_json_str(&raw_data)
            .map(|r| RecordSummary::from_record(&r))
            .unwrap_or_default();
        if let Some(own) = summary.record_number.filter(|own| *own != number) {
            debug!(%kind, %number, %own, "stored under a number other than its N_ZAP");
        }
        Self {
            kind,
            number,
            raw_data,
            summary,
        }
    }

    /// Wrap a raw encoding under the number it carries in `N_ZAP`.
    pub fn numbered(kind: RecordKind, raw_data: impl Into<String>) -> StoreResult<Self> {
        let raw_data = raw_data.into();
        let record = NestedRecord::from_json_str(&raw_data)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let summary = RecordSummary::from_record(&record);
        let number = summary
            .record_number
            .ok_or_else(|| StoreError::Decode("record carries no N_ZAP number".into()))?;
        Ok(Self {
            kind,
            number,
            raw_data,
            summary,
        })
    }

    /// Encode a decoded record for storage.
    pub fn from_record(
        kind: RecordKind,
        number: RecordNumber,
        record: &NestedRecord,
    ) -> StoreResult<Self> {
        let raw_data = serde_json::to_string(record)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self {
            kind,
            number,
            raw_data,
            summary: RecordSummary::from_record(record),
        })
    }

    /// Decode the raw encoding.
    pub fn decode(&self) -> StoreResult<NestedRecord> {
        NestedRecord::from_json_str(&self.raw_data).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_extracted_from_raw() {
        let rec = StoredRecord::new(
            RecordKind::Test,
            RecordNumber(5),
            r#"{"PACIENT": {"NPOLIS": "123"}, "Z_SL": {"DATE_1": "2020-02-01", "SL": {"DS1": ""}}}"#,
        );
        assert_eq!(rec.summary.policy_number.as_deref(), Some("123"));
        assert_eq!(rec.summary.start_date.as_deref(), Some("2020-02-01"));
        assert_eq!(rec.summary.diagnosis, None);
    }

    #[test]
    fn summary_reads_own_number() {
        let rec = StoredRecord::new(RecordKind::Test, RecordNumber(3), r#"{"N_ZAP": 3}"#);
        assert_eq!(rec.summary.record_number, Some(RecordNumber(3)));

        let text = StoredRecord::new(RecordKind::Test, RecordNumber(4), r#"{"N_ZAP": " 12 "}"#);
        assert_eq!(text.summary.record_number, Some(RecordNumber(12)));

        let junk = StoredRecord::new(RecordKind::Test, RecordNumber(4), r#"{"N_ZAP": "x1"}"#);
        assert_eq!(junk.summary.record_number, None);
    }

    #[test]
    fn numbered_takes_number_from_record() {
        let rec = StoredRecord::numbered(RecordKind::Sample, r#"{"N_ZAP": 41, "A": "1"}"#).unwrap();
        assert_eq!(rec.number, RecordNumber(41));
        assert_eq!(rec.kind, RecordKind::Sample);

        let err = StoredRecord::numbered(RecordKind::Sample, r#"{"A": "1"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn undecodable_raw_keeps_empty_summary() {
        let rec = StoredRecord::new(RecordKind::Sample, RecordNumber(1), "{broken");
        assert_eq!(rec.summary, RecordSummary::default());
        assert!(matches!(rec.decode(), Err(StoreError::Decode(_))));
    }

    #[test]
    fn from_record_roundtrips() {
        let record = NestedRecord::branch([
            ("B", NestedRecord::leaf("2")),
            ("A", NestedRecord::leaf("1")),
        ]);
        let stored = StoredRecord::from_record(RecordKind::Test, RecordNumber(9), &record).unwrap();
        assert_eq!(stored.raw_data, r#"{"B":"2","A":"1"}"#);
        assert_eq!(stored.decode().unwrap(), record);
    }
}
