// crates/hub-strings-core/src/document.rs
// ============================================================================
// Module: Hub Strings Document Parsing
// Description: Raw JSON document layer with duplicate-preserving objects.
// Purpose: Observe every key as written so duplicates and bad leaves surface.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! `serde_json::Value` keeps only the last of two duplicate keys, so the
//! document is first read into [`RawNode`], whose objects preserve every entry
//! in source order. [`build_namespace`] then converts the raw tree into the
//! typed [`Namespace`] model, checking duplicates, key segments, nesting depth
//! and leaf syntax along the way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::IgnoredAny;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;

use crate::error::LoadError;
use crate::key::KeyPath;
use crate::table::Namespace;
use crate::table::Node;
use crate::template::LeafEntry;
use crate::template::MalformedReferencePolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum document size in bytes.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;
/// Default maximum namespace nesting depth.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

// ============================================================================
// SECTION: Load Options
// ============================================================================

/// Limits and policies applied while loading a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Maximum accepted input size in bytes.
    pub max_document_bytes: usize,
    /// Maximum depth of nested namespace nodes (the root is depth 1).
    pub max_nesting_depth: usize,
    /// Handling of malformed `[%key:...%]` syntax.
    pub malformed_reference: MalformedReferencePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            malformed_reference: MalformedReferencePolicy::Reject,
        }
    }
}

// ============================================================================
// SECTION: Raw Nodes
// ============================================================================

/// A JSON node as written, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawNode {
    /// String leaf.
    Leaf(String),
    /// Object with entries in source order, duplicates preserved.
    Branch(Vec<(String, RawNode)>),
    /// Any other JSON value, labelled by kind.
    Invalid(&'static str),
}

impl<'de> Deserialize<'de> for RawNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawNodeVisitor)
    }
}

/// Visitor producing [`RawNode`] values.
struct RawNodeVisitor;

impl<'de> Visitor<'de> for RawNodeVisitor {
    type Value = RawNode;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or an object of strings")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
        Ok(RawNode::Leaf(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
        Ok(RawNode::Leaf(value))
    }

    fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("boolean"))
    }

    fn visit_i64<E>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("number"))
    }

    fn visit_u64<E>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("number"))
    }

    fn visit_f64<E>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("number"))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("null"))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(RawNode::Invalid("null"))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawNode::Invalid("array"))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<RawNode>()?;
            entries.push((key, value));
        }
        Ok(RawNode::Branch(entries))
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses document bytes into the root namespace.
///
/// # Errors
///
/// Returns [`LoadError`] when the document is oversized, not UTF-8, not JSON,
/// not an object at the root, or fails any structural check.
pub(crate) fn parse_document(bytes: &[u8], options: &LoadOptions) -> Result<Namespace, LoadError> {
    if bytes.len() > options.max_document_bytes {
        return Err(LoadError::malformed(format!(
            "document is {} bytes, limit is {}",
            bytes.len(),
            options.max_document_bytes
        )));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|_| LoadError::malformed("document must be utf-8"))?;
    let raw: RawNode =
        serde_json::from_str(text).map_err(|err| LoadError::malformed(err.to_string()))?;
    match raw {
        RawNode::Branch(entries) => build_namespace(entries, None, 1, options),
        RawNode::Leaf(_) => Err(LoadError::malformed("document root must be an object, found string")),
        RawNode::Invalid(kind) => {
            Err(LoadError::malformed(format!("document root must be an object, found {kind}")))
        }
    }
}

/// Converts raw object entries into a typed namespace node.
///
/// # Errors
///
/// Returns [`LoadError::DuplicateKey`] for repeated keys and
/// [`LoadError::Malformed`] for invalid keys, leaves, or excessive nesting.
pub(crate) fn build_namespace(
    entries: Vec<(String, RawNode)>,
    parent: Option<&KeyPath>,
    depth: usize,
    options: &LoadOptions,
) -> Result<Namespace, LoadError> {
    if depth > options.max_nesting_depth {
        let reason = format!("nesting exceeds depth limit of {}", options.max_nesting_depth);
        return Err(match parent {
            Some(parent) => LoadError::malformed_at(parent.clone(), reason),
            None => LoadError::malformed(reason),
        });
    }
    let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
    for (key, raw) in entries {
        let path = child_path(parent, &key)?;
        if nodes.contains_key(&key) {
            return Err(LoadError::DuplicateKey {
                path,
            });
        }
        let node = match raw {
            RawNode::Leaf(value) => {
                let entry = LeafEntry::parse(&value, options.malformed_reference)
                    .map_err(|err| LoadError::malformed_at(path.clone(), err.to_string()))?;
                Node::Leaf(entry)
            }
            RawNode::Branch(children) => {
                Node::Namespace(build_namespace(children, Some(&path), depth + 1, options)?)
            }
            RawNode::Invalid(kind) => {
                return Err(LoadError::malformed_at(
                    path,
                    format!("leaf values must be strings, found {kind}"),
                ));
            }
        };
        nodes.insert(key, node);
    }
    Ok(Namespace::from_nodes(nodes))
}

/// Builds the path of `key` under `parent`, rejecting unaddressable keys.
fn child_path(parent: Option<&KeyPath>, key: &str) -> Result<KeyPath, LoadError> {
    let result = match parent {
        Some(parent) => parent.child(key),
        None => KeyPath::from_segments([key]),
    };
    result.map_err(|err| {
        let reason = format!("invalid key `{key}`: {err}");
        match parent {
            Some(parent) => LoadError::malformed_at(parent.clone(), reason),
            None => LoadError::malformed(reason),
        }
    })
}
