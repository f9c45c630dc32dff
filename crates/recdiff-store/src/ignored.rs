//! Keys that always compare as unchanged.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use recdiff_types::FlatPath;

use crate::error::StoreResult;
use crate::traits::IgnoredKeySource;

/// A set of ignored key names.
///
/// A path is ignored when its leaf segment, or its full canonical string,
/// is in the set. `DATE_IN` therefore matches `Z_SL/SL/USL/0/DATE_IN`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoredKeys {
    names: BTreeSet<String>,
}

impl IgnoredKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one key per line. Blank lines and `#` comments are skipped.
    pub fn parse_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Returns `true` if the path is ignored.
    pub fn contains(&self, path: &FlatPath) -> bool {
        if self.names.is_empty() {
            return false;
        }
        self.names.contains(path.leaf()) || self.names.contains(&path.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoredKeys {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A fixed, in-memory ignored-key set.
#[derive(Clone, Debug, Default)]
pub struct StaticIgnoredKeys(pub IgnoredKeys);

impl IgnoredKeySource for StaticIgnoredKeys {
    fn ignored_keys(&self) -> StoreResult<IgnoredKeys> {
        Ok(self.0.clone())
    }
}

/// Ignored keys read from a text file, one key per line.
///
/// The file is re-read on every call, so edits apply to the next comparison.
#[derive(Clone, Debug)]
pub struct FileIgnoredKeys {
    path: PathBuf,
}

impl FileIgnoredKeys {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IgnoredKeySource for FileIgnoredKeys {
    fn ignored_keys(&self) -> StoreResult<IgnoredKeys> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(IgnoredKeys::parse_lines(&text))
    }
}
