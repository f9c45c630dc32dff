//! Annotated tree reconstruction from a classified line sequence.
//!
//! Lines are inserted front to back. Each branch keeps its children in
//! first-seen order, so sibling order follows the line sequence. A repeated
//! leaf path updates the existing leaf in place.
//!
//! A key can name a leaf on one side and a branch on the other (for example
//! `A` added as a value while the sample has `A/B`). The two are kept as
//! separate siblings with the same key, so no line is lost.

use serde::{Deserialize, Serialize};

use recdiff_types::{NestedRecord, Scalar};

use crate::merge::{Classification, DiffLineSequence};

/// Which record's values an annotated tree shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Test,
    Sample,
}

/// A record-shaped tree whose leaves carry a diff classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum AnnotatedTree {
    Leaf {
        /// `None` when the line has no value on this side.
        value: Option<Scalar>,
        classification: Classification,
    },
    Branch {
        children: Vec<(String, AnnotatedTree)>,
    },
}

impl AnnotatedTree {
    fn empty_branch() -> Self {
        Self::Branch {
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    /// Children of a branch; empty for a leaf.
    pub fn children(&self) -> &[(String, AnnotatedTree)] {
        match self {
            Self::Branch { children } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// First child with this key.
    pub fn get(&self, key: &str) -> Option<&AnnotatedTree> {
        self.children()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Branch { children } => children.iter().map(|(_, c)| c.leaf_count()).sum(),
        }
    }

    /// Leaf paths and classifications in display order.
    pub fn leaf_rows(&self) -> Vec<(String, Classification)> {
        let mut rows = Vec::new();
        collect_rows(self, &mut Vec::new(), &mut rows);
        rows
    }

    /// Drop classifications, keeping shape and values.
    ///
    /// Leaves without a value become `Null`. A branch whose keys run `0..n`
    /// in order becomes a list again.
    pub fn strip(&self) -> NestedRecord {
        match self {
            Self::Leaf { value, .. } => NestedRecord::Leaf(value.clone().unwrap_or(Scalar::Null)),
            Self::Branch { children } if is_indexed(children) => {
                NestedRecord::List(children.iter().map(|(_, c)| c.strip()).collect())
            }
            Self::Branch { children } => {
                NestedRecord::branch(children.iter().map(|(k, c)| (k.clone(), c.strip())))
            }
        }
    }
}

fn is_indexed(children: &[(String, AnnotatedTree)]) -> bool {
    !children.is_empty()
        && children
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == i.to_string())
}

fn collect_rows<'a>(
    node: &'a AnnotatedTree,
    prefix: &mut Vec<&'a str>,
    rows: &mut Vec<(String, Classification)>,
) {
    match node {
        AnnotatedTree::Leaf { classification, .. } => rows.push((prefix.join("/"), *classification)),
        AnnotatedTree::Branch { children } => {
            for (key, child) in children {
                prefix.push(key.as_str());
                collect_rows(child, prefix, rows);
                prefix.pop();
            }
        }
    }
}

/// Rebuild the tree for one side of the comparison.
pub fn build_tree(lines: &DiffLineSequence, side: Side) -> AnnotatedTree {
    let mut root = Vec::new();
    for line in lines {
        let leaf = AnnotatedTree::Leaf {
            value: line.value(side).cloned(),
            classification: line.classification,
        };
        insert(&mut root, line.path.segments(), leaf);
    }
    AnnotatedTree::Branch { children: root }
}

fn insert(children: &mut Vec<(String, AnnotatedTree)>, segments: &[String], leaf: AnnotatedTree) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        match children.iter_mut().find(|(k, n)| k == head && n.is_leaf()) {
            Some((_, slot)) => *slot = leaf,
            None => children.push((head.clone(), leaf)),
        }
        return;
    }

    let index = match children.iter().position(|(k, n)| k == head && n.is_branch()) {
        Some(i) => i,
        None => {
            children.push((head.clone(), AnnotatedTree::empty_branch()));
            children.len() - 1
        }
    };
    if let AnnotatedTree::Branch { children: grandchildren } = &mut children[index].1 {
        insert(grandchildren, rest, leaf);
    }
}
