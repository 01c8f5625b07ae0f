// crates/hub-strings-core/src/lib.rs
// ============================================================================
// Module: Hub Strings Core Library
// Description: Public API surface for string resource loading and rendering.
// Purpose: Expose the table model, resolver, catalog, and audit sinks.
// Dependencies: crate::{audit, catalog, document, error, key, resolver, table, template}
// ============================================================================

//! ## Overview
//! Hub Strings loads localization resources for a smart-home hub integration:
//! nested JSON documents whose leaves are display templates. Templates may
//! carry `{identifier}` placeholders and `[%key:...%]` references into the same
//! table or a shared `common` table. Loading tags every leaf once; resolution
//! follows references under a depth bound and rendering substitutes
//! caller-supplied values.
//!
//! The free functions [`load`], [`resolve`] and [`render`] cover the
//! single-table case. Use [`Catalog`] to combine an integration table with
//! shared tables.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod document;
pub mod error;
pub mod key;
pub mod resolver;
pub mod table;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSeverity;
pub use audit::AuditSink;
pub use audit::CatalogLoadEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RenderFallbackEvent;
pub use audit::StderrAuditSink;
pub use catalog::Catalog;
pub use document::LoadOptions;
pub use error::LoadError;
pub use error::ResolveError;
pub use key::KeyPath;
pub use key::KeyPathError;
pub use resolver::DEFAULT_MAX_EXPANSIONS;
pub use resolver::DEFAULT_MAX_OUTPUT_BYTES;
pub use resolver::DEFAULT_MAX_REDIRECT_DEPTH;
pub use resolver::NO_PARAMS;
pub use resolver::Params;
pub use resolver::ResolveLimits;
pub use resolver::ResolvedSegment;
pub use resolver::ResolvedString;
pub use resolver::Resolver;
pub use table::Namespace;
pub use table::Node;
pub use table::StringTable;
pub use template::LeafEntry;
pub use template::MalformedReferencePolicy;
pub use template::Segment;
pub use template::Template;

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Parses a resource document with default options.
///
/// # Errors
///
/// Returns [`LoadError::Malformed`] for structurally invalid input and
/// [`LoadError::DuplicateKey`] when a namespace repeats a key.
pub fn load(source: &str) -> Result<StringTable, LoadError> {
    StringTable::load(source)
}

/// Resolves `key` in a single table, following redirects.
///
/// # Errors
///
/// Returns [`ResolveError`] when the key is absent, or its references are
/// dangling or cyclic.
pub fn resolve(table: &StringTable, key: &str) -> Result<ResolvedString, ResolveError> {
    Resolver::new(table).resolve(key)
}

/// Resolves `key` in a single table and substitutes placeholders.
///
/// # Errors
///
/// Returns [`ResolveError`] on resolution failure, or
/// [`ResolveError::MissingPlaceholder`] when `params` lacks a value.
pub fn render<P: Params + ?Sized>(
    table: &StringTable,
    key: &str,
    params: &P,
) -> Result<String, ResolveError> {
    Resolver::new(table).render(key, params)
}
