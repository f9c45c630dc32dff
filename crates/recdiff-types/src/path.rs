//! Flat addressing of record leaves.
//!
//! A [`FlatPath`] names one leaf by the keys of its ancestors. Its canonical
//! string form joins the segments with [`PATH_DELIMITER`], so segments may not
//! contain the delimiter and may not be empty. Both rules are checked on
//! construction; a `FlatPath` value is always well formed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::scalar::Scalar;

/// Separator between segments in the canonical path string.
pub const PATH_DELIMITER: char = '/';

/// Ordered, non-empty sequence of key segments identifying one leaf.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlatPath {
    segments: Vec<String>,
}

impl FlatPath {
    /// Build a path from segments, validating each one.
    pub fn new<I, S>(segments: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse the canonical `a/b/c` form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        Self::new(s.split(PATH_DELIMITER))
    }

    /// The key segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment (the leaf's own key).
    pub fn leaf(&self) -> &str {
        // Non-empty by construction.
        self.segments.last().map_or("", String::as_str)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if `self` lies under (or is equal to) `prefix`.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.segments.len() >= prefix.len()
            && self.segments.iter().zip(prefix).all(|(a, b)| a == b)
    }
}

/// Check that a single key can be used as a path segment.
pub fn validate_segment(segment: &str) -> Result<(), TypeError> {
    if segment.is_empty() {
        return Err(TypeError::EmptySegment);
    }
    if segment.contains(PATH_DELIMITER) {
        return Err(TypeError::DelimiterInSegment {
            segment: segment.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for FlatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_DELIMITER}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FlatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlatPath({self})")
    }
}

impl Serialize for FlatPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlatPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One flattened leaf: its path and its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: FlatPath,
    pub value: Scalar,
}

impl FlatEntry {
    pub fn new(path: FlatPath, value: Scalar) -> Self {
        Self { path, value }
    }
}
