// crates/hub-strings-core/src/key.rs
// ============================================================================
// Module: Hub Strings Key Paths
// Description: Typed key paths addressing leaves in a resource table.
// Purpose: Accept dotted and `::`-separated forms with one canonical value.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`KeyPath`] is a non-empty sequence of key segments. Callers address
//! strings with dotted paths (`config.step.user.title`) while reference
//! values inside resources use `::` separators
//! (`common::config_flow::error::cannot_connect`). Both parse to the same
//! path; the display form is always dotted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator used by caller-facing dotted paths.
pub const DOT_SEPARATOR: char = '.';
/// Separator used by reference values embedded in resources.
pub const REFERENCE_SEPARATOR: &str = "::";

// ============================================================================
// SECTION: Key Path
// ============================================================================

/// Canonical path to a node in a resource table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Parses a dotted or `::`-separated path.
    ///
    /// A path containing `::` is split on `::` only; otherwise it is split on
    /// `.`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when the path is empty or has an empty or
    /// otherwise invalid segment.
    pub fn parse(text: &str) -> Result<Self, KeyPathError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(KeyPathError::Empty);
        }
        let segments: Vec<String> = if trimmed.contains(REFERENCE_SEPARATOR) {
            trimmed.split(REFERENCE_SEPARATOR).map(str::to_string).collect()
        } else {
            trimmed.split(DOT_SEPARATOR).map(str::to_string).collect()
        };
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Builds a path from pre-split segments.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when no segments are given or any segment is
    /// invalid.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, KeyPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyPathError::Empty);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when the segment is invalid.
    pub fn child(&self, segment: &str) -> Result<Self, KeyPathError> {
        validate_segment(segment)?;
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Ok(Self(segments))
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the final segment.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Returns the path in reference (`::`) form.
    #[must_use]
    pub fn to_reference_form(&self) -> String {
        self.0.join(REFERENCE_SEPARATOR)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = KeyPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = KeyPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<KeyPath> for String {
    fn from(value: KeyPath) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a key path or segment is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyPathError {
    /// The path has no segments.
    #[error("key path is empty")]
    Empty,
    /// A segment is empty (for example `config..title`).
    #[error("key path contains an empty segment")]
    EmptySegment,
    /// A segment contains a separator and could never be addressed.
    #[error("key segment `{0}` contains a path separator")]
    SeparatorInSegment(String),
    /// A segment starts or ends with whitespace, which lookups trim away.
    #[error("key segment `{0}` has leading or trailing whitespace")]
    PaddedSegment(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a single key segment.
///
/// # Errors
///
/// Returns [`KeyPathError`] when the segment is empty, contains `.` or `::`,
/// or is padded with whitespace.
pub fn validate_segment(segment: &str) -> Result<(), KeyPathError> {
    if segment.is_empty() {
        return Err(KeyPathError::EmptySegment);
    }
    if segment.trim() != segment {
        return Err(KeyPathError::PaddedSegment(segment.to_string()));
    }
    if segment.contains(DOT_SEPARATOR) || segment.contains(REFERENCE_SEPARATOR) {
        return Err(KeyPathError::SeparatorInSegment(segment.to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn dotted_and_reference_forms_are_equal() {
        let dotted = KeyPath::parse("common.config_flow.error.cannot_connect").unwrap();
        let reference = KeyPath::parse("common::config_flow::error::cannot_connect").unwrap();
        assert_eq!(dotted, reference);
        assert_eq!(reference.to_string(), "common.config_flow.error.cannot_connect");
        assert_eq!(dotted.to_reference_form(), "common::config_flow::error::cannot_connect");
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert_eq!(KeyPath::parse(""), Err(KeyPathError::Empty));
        assert_eq!(KeyPath::parse("config..title"), Err(KeyPathError::EmptySegment));
        assert_eq!(KeyPath::parse("config::"), Err(KeyPathError::EmptySegment));
    }

    #[test]
    fn reference_form_rejects_stray_dots() {
        let err = KeyPath::parse("common::config.flow").unwrap_err();
        assert!(matches!(err, KeyPathError::SeparatorInSegment(_)));
    }

    #[test]
    fn padded_segments_are_rejected() {
        assert_eq!(
            KeyPath::from_segments([" title"]),
            Err(KeyPathError::PaddedSegment(" title".to_string()))
        );
        assert!(KeyPath::parse("config.name .x").is_err());
        assert!(KeyPath::parse("common:: state").is_err());
        assert_eq!(KeyPath::parse(" config.title ").unwrap().to_string(), "config.title");
        assert!(KeyPath::parse("config.two words").is_ok());
    }

    #[test]
    fn child_extends_path() {
        let base = KeyPath::parse("config.step").unwrap();
        let child = base.child("user").unwrap();
        assert_eq!(child.to_string(), "config.step.user");
        assert_eq!(child.leaf_name(), "user");
        assert!(base.child("a.b").is_err());
    }
}
