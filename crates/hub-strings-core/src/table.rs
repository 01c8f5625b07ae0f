// crates/hub-strings-core/src/table.rs
// ============================================================================
// Module: Hub Strings Resource Table
// Description: Immutable namespace tree of parsed leaf entries.
// Purpose: Hold one loaded resource document for lookup by key path.
// Dependencies: crate::{document, template, key}
// ============================================================================

//! ## Overview
//! A [`StringTable`] is the in-memory form of one resource document. It is
//! built once by [`StringTable::load`] and never mutated afterwards, so it is
//! `Send + Sync` and can be shared across readers behind an `Arc`.
//!
//! The table only stores and looks up entries. Following references and
//! substituting placeholders is the job of [`crate::Catalog`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::document::LoadOptions;
use crate::document::parse_document;
use crate::error::LoadError;
use crate::key::KeyPath;
use crate::template::LeafEntry;

// ============================================================================
// SECTION: Nodes
// ============================================================================

/// A child of a namespace node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested namespace.
    Namespace(Namespace),
    /// Terminal string entry.
    Leaf(LeafEntry),
}

/// A named grouping of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    /// Children keyed by segment, sorted for deterministic iteration.
    nodes: BTreeMap<String, Node>,
}

impl Namespace {
    /// Wraps an already-validated node map.
    pub(crate) const fn from_nodes(nodes: BTreeMap<String, Node>) -> Self {
        Self {
            nodes,
        }
    }

    /// Returns the child at `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Iterates children in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the namespace has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks `segments` from this node.
    fn descend(&self, segments: &[String]) -> Option<&Node> {
        let (first, rest) = segments.split_first()?;
        let node = self.nodes.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            Node::Namespace(child) => child.descend(rest),
            Node::Leaf(_) => None,
        }
    }

    /// Appends every leaf below this node to `out`.
    fn collect_leaves<'a>(&'a self, prefix: &[String], out: &mut Vec<(KeyPath, &'a LeafEntry)>) {
        for (key, node) in &self.nodes {
            let mut segments = prefix.to_vec();
            segments.push(key.clone());
            match node {
                Node::Leaf(entry) => {
                    if let Ok(path) = KeyPath::from_segments(segments) {
                        out.push((path, entry));
                    }
                }
                Node::Namespace(child) => child.collect_leaves(&segments, out),
            }
        }
    }

    /// Counts leaves below this node.
    fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| match node {
                Node::Leaf(_) => 1,
                Node::Namespace(child) => child.leaf_count(),
            })
            .sum()
    }
}

// ============================================================================
// SECTION: String Table
// ============================================================================

/// One loaded resource document.
///
/// # Example
///
/// ```
/// use hub_strings_core::KeyPath;
/// use hub_strings_core::StringTable;
///
/// let table = StringTable::load(r#"{"config": {"step": {"user": {"title": "Pick a device"}}}}"#)?;
/// let path = KeyPath::parse("config.step.user.title")?;
/// assert!(table.get(&path).is_some());
/// assert_eq!(table.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    /// Root namespace.
    root: Namespace,
    /// Cached number of leaves.
    leaves: usize,
}

impl StringTable {
    /// Loads a document with default [`LoadOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the document is malformed or repeats a key.
    pub fn load(source: &str) -> Result<Self, LoadError> {
        Self::load_with(source.as_bytes(), &LoadOptions::default())
    }

    /// Loads a document from raw bytes with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the document is malformed or repeats a key.
    pub fn load_with(source: &[u8], options: &LoadOptions) -> Result<Self, LoadError> {
        let root = parse_document(source, options)?;
        let leaves = root.leaf_count();
        Ok(Self {
            root,
            leaves,
        })
    }

    /// Returns the root namespace.
    #[must_use]
    pub const fn root(&self) -> &Namespace {
        &self.root
    }

    /// Returns the leaf entry at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&LeafEntry> {
        match self.root.descend(path.segments())? {
            Node::Leaf(entry) => Some(entry),
            Node::Namespace(_) => None,
        }
    }

    /// Returns the namespace node at `path`, if any.
    #[must_use]
    pub fn namespace(&self, path: &KeyPath) -> Option<&Namespace> {
        match self.root.descend(path.segments())? {
            Node::Namespace(namespace) => Some(namespace),
            Node::Leaf(_) => None,
        }
    }

    /// Returns every leaf with its full path, sorted by path.
    #[must_use]
    pub fn entries(&self) -> Vec<(KeyPath, &LeafEntry)> {
        let mut out = Vec::with_capacity(self.leaves);
        self.root.collect_leaves(&[], &mut out);
        out
    }

    /// Returns every leaf path, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<KeyPath> {
        self.entries().into_iter().map(|(path, _)| path).collect()
    }

    /// Number of leaf entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.leaves
    }

    /// Whether the table has no leaf entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leaves == 0
    }
}
