//! The nested record tree.
//!
//! Records arrive as JSON documents. Objects become [`NestedRecord::Branch`]
//! with their key order preserved, arrays become [`NestedRecord::List`], and
//! everything else becomes a [`NestedRecord::Leaf`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::TypeError;
use crate::scalar::Scalar;

/// A tree of ordered named branches, repeated groups, and scalar leaves.
///
/// Equality compares branch contents by key and ignores sibling order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NestedRecord {
    /// A scalar value.
    Leaf(Scalar),
    /// Children keyed by name, in insertion order.
    Branch(IndexMap<String, NestedRecord>),
    /// A repeated group. Children are addressed by their decimal index.
    List(Vec<NestedRecord>),
}

impl NestedRecord {
    /// An empty branch.
    pub fn empty() -> Self {
        Self::Branch(IndexMap::new())
    }

    /// Build a branch from key/child pairs.
    ///
    /// A repeated key replaces the earlier child in place.
    pub fn branch<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, NestedRecord)>,
        K: Into<String>,
    {
        Self::Branch(
            children
                .into_iter()
                .map(|(key, child)| (key.into(), child))
                .collect(),
        )
    }

    /// Build a leaf.
    pub fn leaf(value: impl Into<Scalar>) -> Self {
        Self::Leaf(value.into())
    }

    /// Decode a record from its JSON encoding.
    pub fn from_json_str(raw: &str) -> Result<Self, TypeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| TypeError::Decode(e.to_string()))?;
        Ok(Self::from_json_value(value))
    }

    /// Convert a JSON value. Total: every JSON value has a record shape.
    pub fn from_json_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Leaf(Scalar::Null),
            Value::Bool(b) => Self::Leaf(Scalar::Bool(b)),
            Value::Number(n) => Self::Leaf(Scalar::Number(n)),
            Value::String(s) => Self::Leaf(Scalar::String(s)),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json_value).collect()),
            Value::Object(map) => Self::Branch(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json_value(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back to JSON, preserving key order.
    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Leaf(s) => s.to_json_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json_value).collect()),
            Self::Branch(children) => {
                let mut map = Map::new();
                for (k, v) in children {
                    map.insert(k.clone(), v.to_json_value());
                }
                Value::Object(map)
            }
        }
    }

    /// Child of a branch by key, or of a list by decimal index.
    pub fn get(&self, key: &str) -> Option<&NestedRecord> {
        match self {
            Self::Branch(children) => children.get(key),
            Self::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Leaf(_) => None,
        }
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, key: &str) -> Option<&mut NestedRecord> {
        match self {
            Self::Branch(children) => children.get_mut(key),
            Self::List(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            Self::Leaf(_) => None,
        }
    }

    /// Walk a key path from this node.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&NestedRecord> {
        path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Mutable variant of [`get_path`](Self::get_path).
    pub fn get_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut NestedRecord> {
        path.iter()
            .try_fold(self, |node, key| node.get_mut(key.as_ref()))
    }

    /// The scalar if this is a leaf.
    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Self::Leaf(s) => Some(s),
            Self::Branch(_) | Self::List(_) => None,
        }
    }

    /// The items if this is a list.
    pub fn as_list(&self) -> Option<&[NestedRecord]> {
        match self {
            Self::List(items) => Some(items),
            Self::Leaf(_) | Self::Branch(_) => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// Returns `true` for a branch or list with no children.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Branch(children) => children.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Number of scalar leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(children) => children.values().map(Self::leaf_count).sum(),
            Self::List(items) => items.iter().map(Self::leaf_count).sum(),
        }
    }

    /// First leaf named `key` in depth-first order.
    pub fn find_leaf(&self, key: &str) -> Option<&Scalar> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(children) => children.iter().find_map(|(k, child)| match child {
                Self::Leaf(s) if k == key => Some(s),
                other => other.find_leaf(key),
            }),
            Self::List(items) => items.iter().find_map(|item| item.find_leaf(key)),
        }
    }
}

impl Default for NestedRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for NestedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NestedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json_value)
    }
}
