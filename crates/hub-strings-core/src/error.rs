// crates/hub-strings-core/src/error.rs
// ============================================================================
// Module: Hub Strings Errors
// Description: Load-time and resolve-time error taxonomy.
// Purpose: Separate fatal document errors from recoverable lookup errors.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Errors are split by lifecycle phase. [`LoadError`] is raised while a
//! document is parsed and aborts construction of the table. [`ResolveError`]
//! is raised by lookups and renders; some variants are recoverable by the
//! consuming framework and some indicate an authoring bug in the resource.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::key::KeyPath;

// ============================================================================
// SECTION: Load Errors
// ============================================================================

/// Errors raised while loading a resource document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The document is not structurally valid.
    #[error("malformed resource{}: {reason}", location(.path))]
    Malformed {
        /// Location of the offending node, when known.
        path: Option<KeyPath>,
        /// Human-readable reason.
        reason: String,
    },
    /// A key appears twice within the same namespace node.
    #[error("duplicate key `{path}`")]
    DuplicateKey {
        /// Full path of the repeated key.
        path: KeyPath,
    },
}

impl LoadError {
    /// Builds a malformed-document error without location context.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: None,
            reason: reason.into(),
        }
    }

    /// Builds a malformed-document error located at `path`.
    #[must_use]
    pub fn malformed_at(path: KeyPath, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: Some(path),
            reason: reason.into(),
        }
    }
}

/// Formats an optional location suffix for malformed errors.
fn location(path: &Option<KeyPath>) -> String {
    path.as_ref().map_or_else(String::new, |path| format!(" at `{path}`"))
}

// ============================================================================
// SECTION: Resolve Errors
// ============================================================================

/// Errors raised while resolving or rendering a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No leaf entry exists at the requested path.
    #[error("key not found: `{key}`")]
    KeyNotFound {
        /// Requested key as given by the caller.
        key: String,
    },
    /// A reference points at a key that does not exist.
    #[error("`{key}` references missing key `{target}`")]
    DanglingReference {
        /// Key whose entry holds the reference.
        key: KeyPath,
        /// Missing reference target.
        target: KeyPath,
    },
    /// Reference resolution revisited a key or exceeded the depth limit.
    #[error("redirect cycle while resolving `{key}`: {}", render_chain(.chain))]
    RedirectCycle {
        /// Key that was requested.
        key: KeyPath,
        /// Keys visited, in order, up to and including the repeat.
        chain: Vec<KeyPath>,
    },
    /// Resolving one key exceeded the visit or output budget.
    #[error("expanding `{key}` exceeds the limit of {limit} {unit}")]
    ExpansionLimit {
        /// Key that was requested.
        key: KeyPath,
        /// Bound that was exceeded.
        limit: usize,
        /// What the bound counts.
        unit: &'static str,
    },
    /// A template placeholder had no value in the render parameters.
    #[error("missing placeholder `{{{placeholder}}}` for `{key}`")]
    MissingPlaceholder {
        /// Key being rendered.
        key: KeyPath,
        /// Placeholder identifier without braces.
        placeholder: String,
    },
}

impl ResolveError {
    /// Returns true when the consuming framework may degrade to a fallback.
    ///
    /// Reference defects are authoring bugs and report false.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. } | Self::MissingPlaceholder { .. })
    }

    /// Returns a stable label for the error kind, used in audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::KeyNotFound { .. } => "key_not_found",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::RedirectCycle { .. } => "redirect_cycle",
            Self::ExpansionLimit { .. } => "expansion_limit",
            Self::MissingPlaceholder { .. } => "missing_placeholder",
        }
    }
}

/// Joins a redirect chain as `a -> b -> c`.
fn render_chain(chain: &[KeyPath]) -> String {
    chain.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ")
}
