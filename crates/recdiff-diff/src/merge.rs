//! Line merge: two flattened records into one classified line sequence.
//!
//! This is a positional heuristic, not a minimal edit script:
//!
//! - **Pass 1** walks the test entries in order. A path also present in the
//!   sample is `Unchanged` (equal values, or an ignored key) or `Changed`;
//!   otherwise it is `Added`.
//! - **Pass 2** walks the sample entries in order. A path absent from the
//!   test is `Deleted` and is inserted at its sample index, shifted right by
//!   the number of `Added` lines at or before that index in the pass-1
//!   sequence. Added lines occupy slots the sample never had.
//!
//! Moved leaves are reported as a delete plus an add.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use recdiff_store::IgnoredKeys;
use recdiff_types::{FlatEntry, FlatPath, Scalar};

use crate::annotate::Side;

/// How one line differs between the two records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Unchanged,
    Changed,
    /// Present only in the test record.
    Added,
    /// Present only in the sample record.
    Deleted,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
            Self::Added => "added",
            Self::Deleted => "deleted",
        }
    }

    /// One-character marker for text listings.
    pub fn marker(self) -> char {
        match self {
            Self::Unchanged => ' ',
            Self::Changed => '~',
            Self::Added => '+',
            Self::Deleted => '-',
        }
    }
}

/// A single classified line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub classification: Classification,
    pub path: FlatPath,
    /// Absent for `Deleted` lines.
    pub test_value: Option<Scalar>,
    /// Absent for `Added` lines.
    pub sample_value: Option<Scalar>,
}

impl DiffLine {
    fn matched(classification: Classification, path: FlatPath, test: Scalar, sample: Scalar) -> Self {
        Self {
            classification,
            path,
            test_value: Some(test),
            sample_value: Some(sample),
        }
    }

    fn added(path: FlatPath, test: Scalar) -> Self {
        Self {
            classification: Classification::Added,
            path,
            test_value: Some(test),
            sample_value: None,
        }
    }

    fn deleted(path: FlatPath, sample: Scalar) -> Self {
        Self {
            classification: Classification::Deleted,
            path,
            test_value: None,
            sample_value: Some(sample),
        }
    }

    /// The value on one side of the comparison.
    pub fn value(&self, side: Side) -> Option<&Scalar> {
        match side {
            Side::Test => self.test_value.as_ref(),
            Side::Sample => self.sample_value.as_ref(),
        }
    }
}

/// Per-classification line counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub changed: usize,
    pub added: usize,
    pub deleted: usize,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.unchanged + self.changed + self.added + self.deleted
    }
}

/// The merged lines in presentation order.
///
/// Only [`merge_lines`] builds a sequence; it is never re-sorted afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffLineSequence {
    lines: Vec<DiffLine>,
}

impl DiffLineSequence {
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines with the given classification.
    pub fn count(&self, classification: Classification) -> usize {
        self.lines
            .iter()
            .filter(|l| l.classification == classification)
            .count()
    }

    /// Returns `true` if any line is not `Unchanged`.
    pub fn has_differences(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.classification != Classification::Unchanged)
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for line in &self.lines {
            match line.classification {
                Classification::Unchanged => summary.unchanged += 1,
                Classification::Changed => summary.changed += 1,
                Classification::Added => summary.added += 1,
                Classification::Deleted => summary.deleted += 1,
            }
        }
        summary
    }
}

impl<'a> IntoIterator for &'a DiffLineSequence {
    type Item = &'a DiffLine;
    type IntoIter = std::slice::Iter<'a, DiffLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Merge flattened test and sample entries into one classified sequence.
///
/// Total over any inputs; two empty inputs give an empty sequence.
pub fn merge_lines(test: &[FlatEntry], sample: &[FlatEntry], ignored: &IgnoredKeys) -> DiffLineSequence {
    let sample_values: HashMap<&FlatPath, &Scalar> =
        sample.iter().map(|e| (&e.path, &e.value)).collect();

    let mut lines = Vec::with_capacity(test.len() + sample.len());
    for entry in test {
        let line = match sample_values.get(&entry.path) {
            Some(&sample_value) => {
                let classification =
                    if entry.value.same_text(sample_value) || ignored.contains(&entry.path) {
                        Classification::Unchanged
                    } else {
                        Classification::Changed
                    };
                DiffLine::matched(classification, entry.path.clone(), entry.value.clone(), sample_value.clone())
            }
            None => DiffLine::added(entry.path.clone(), entry.value.clone()),
        };
        lines.push(line);
    }

    // added_before[k] = number of Added lines at positions < k in pass 1.
    let mut added_before = Vec::with_capacity(lines.len() + 1);
    added_before.push(0usize);
    for line in &lines {
        let prev = added_before.last().copied().unwrap_or(0);
        added_before.push(prev + usize::from(line.classification == Classification::Added));
    }
    let pass_one_len = lines.len();

    let test_paths: HashSet<&FlatPath> = test.iter().map(|e| &e.path).collect();
    for (index, entry) in sample.iter().enumerate() {
        if test_paths.contains(&entry.path) {
            continue;
        }
        let correction = added_before[(index + 1).min(pass_one_len)];
        let at = (index + correction).min(lines.len());
        lines.insert(at, DiffLine::deleted(entry.path.clone(), entry.value.clone()));
    }

    debug!(
        test = test.len(),
        sample = sample.len(),
        lines = lines.len(),
        "merged flattened records"
    );
    DiffLineSequence { lines }
}
