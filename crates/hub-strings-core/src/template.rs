// crates/hub-strings-core/src/template.rs
// ============================================================================
// Module: Hub Strings Templates
// Description: Parse-time tagging of leaf values into typed segments.
// Purpose: Avoid re-scanning strings for placeholders and references on lookup.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every leaf string is scanned once at load time and split into
//! [`Segment`]s: literal text, `{identifier}` placeholders, and
//! `[%key:path%]` references. A value that is exactly one reference becomes a
//! [`LeafEntry::Redirect`]; anything else is a [`LeafEntry::Literal`].
//!
//! Placeholder identifiers match `[A-Za-z_][A-Za-z0-9_]*`. Braces that do not
//! form a placeholder are kept as literal text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::key::KeyPath;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening token of an embedded reference.
pub const REFERENCE_OPEN: &str = "[%key:";
/// Closing token of an embedded reference.
pub const REFERENCE_CLOSE: &str = "%]";

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Handling of reference syntax that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReferencePolicy {
    /// Fail the load with a malformed-resource error.
    #[default]
    Reject,
    /// Keep the text verbatim as literal content.
    Literal,
}

// ============================================================================
// SECTION: Segments
// ============================================================================

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal display text.
    Text(String),
    /// Caller-supplied value, by identifier.
    Placeholder(String),
    /// Inline expansion of another key.
    Reference(KeyPath),
}

/// A literal template: text with optional placeholders and references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    /// Parsed segments in source order.
    segments: Vec<Segment>,
}

impl Template {
    /// Creates a template from already-parsed segments, merging adjacent text.
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for segment in segments {
            if let Segment::Text(text) = &segment {
                if text.is_empty() {
                    continue;
                }
                if let Some(Segment::Text(previous)) = merged.last_mut() {
                    previous.push_str(text);
                    continue;
                }
            }
            merged.push(segment);
        }
        Self {
            segments: merged,
        }
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Returns the keys referenced inline by this template.
    pub fn references(&self) -> impl Iterator<Item = &KeyPath> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Reference(path) => Some(path),
            _ => None,
        })
    }

    /// Returns true when the template has no placeholders or references.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.segments.iter().all(|segment| matches!(segment, Segment::Text(_)))
    }

    /// Reconstructs the template in source syntax.
    #[must_use]
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
                Segment::Reference(path) => {
                    out.push_str(REFERENCE_OPEN);
                    out.push_str(&path.to_reference_form());
                    out.push_str(REFERENCE_CLOSE);
                }
            }
        }
        out
    }
}

// ============================================================================
// SECTION: Leaf Entries
// ============================================================================

/// A terminal value in a resource table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafEntry {
    /// Display text, possibly with placeholders or inline references.
    Literal(Template),
    /// The whole value aliases another key.
    Redirect(KeyPath),
}

impl LeafEntry {
    /// Parses a raw leaf string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when reference syntax is malformed and the
    /// policy is [`MalformedReferencePolicy::Reject`].
    pub fn parse(raw: &str, policy: MalformedReferencePolicy) -> Result<Self, TemplateError> {
        let template = parse_template(raw, policy)?;
        if let [Segment::Reference(path)] = template.segments() {
            return Ok(Self::Redirect(path.clone()));
        }
        Ok(Self::Literal(template))
    }

    /// Reconstructs the leaf in source syntax.
    #[must_use]
    pub fn source_text(&self) -> String {
        match self {
            Self::Literal(template) => template.source_text(),
            Self::Redirect(path) => {
                format!("{REFERENCE_OPEN}{}{REFERENCE_CLOSE}", path.to_reference_form())
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a leaf string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A reference opener has no closing `%]`.
    #[error("unterminated reference starting at byte {offset}")]
    UnterminatedReference {
        /// Byte offset of the opener.
        offset: usize,
    },
    /// A reference encloses an invalid key path.
    #[error("invalid reference `{text}`: {reason}")]
    InvalidReference {
        /// Raw text between the delimiters.
        text: String,
        /// Why the key path was rejected.
        reason: String,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a raw string into a [`Template`].
///
/// # Errors
///
/// Returns [`TemplateError`] for malformed references under the reject policy.
pub fn parse_template(raw: &str, policy: MalformedReferencePolicy) -> Result<Template, TemplateError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = raw;
    let mut offset = 0usize;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with(REFERENCE_OPEN) {
            match scan_reference(rest, offset) {
                Ok((path, consumed)) => {
                    flush_text(&mut segments, &mut text);
                    segments.push(Segment::Reference(path));
                    rest = &rest[consumed ..];
                    offset += consumed;
                    continue;
                }
                Err(err) => match policy {
                    MalformedReferencePolicy::Reject => return Err(err),
                    MalformedReferencePolicy::Literal => {
                        text.push_str(REFERENCE_OPEN);
                        rest = &rest[REFERENCE_OPEN.len() ..];
                        offset += REFERENCE_OPEN.len();
                        continue;
                    }
                },
            }
        }
        if ch == '{'
            && let Some((name, consumed)) = scan_placeholder(rest)
        {
            flush_text(&mut segments, &mut text);
            segments.push(Segment::Placeholder(name.to_string()));
            rest = &rest[consumed ..];
            offset += consumed;
            continue;
        }
        text.push(ch);
        rest = &rest[ch.len_utf8() ..];
        offset += ch.len_utf8();
    }
    flush_text(&mut segments, &mut text);
    Ok(Template::from_segments(segments))
}

/// Scans a reference at the start of `input`, returning the path and bytes consumed.
fn scan_reference(input: &str, offset: usize) -> Result<(KeyPath, usize), TemplateError> {
    let body = &input[REFERENCE_OPEN.len() ..];
    let Some(end) = body.find(REFERENCE_CLOSE) else {
        return Err(TemplateError::UnterminatedReference {
            offset,
        });
    };
    let inner = &body[.. end];
    let path = KeyPath::parse(inner).map_err(|err| TemplateError::InvalidReference {
        text: inner.to_string(),
        reason: err.to_string(),
    })?;
    Ok((path, REFERENCE_OPEN.len() + end + REFERENCE_CLOSE.len()))
}

/// Scans a `{identifier}` placeholder at the start of `input`.
fn scan_placeholder(input: &str) -> Option<(&str, usize)> {
    let body = input.strip_prefix('{')?;
    let end = body.find('}')?;
    let name = &body[.. end];
    if is_identifier(name) { Some((name, end + 2)) } else { None }
}

/// Returns true when `name` is a valid placeholder identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Moves accumulated text into the segment list.
fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
