// crates/hub-strings-core/src/catalog.rs
// ============================================================================
// Module: Hub Strings Catalog
// Description: Owned primary and shared tables with audited fallback rendering.
// Purpose: Provide the injectable handle a consuming framework renders through.
// Dependencies: crate::{resolver, table, audit}
// ============================================================================

//! ## Overview
//! A [`Catalog`] owns its tables behind `Arc`, so a shared `common` table can
//! back many integration catalogs without copying. It is immutable once built
//! and is passed explicitly to whatever renders strings; there is no global
//! instance.
//!
//! [`Catalog::render_or_fallback`] is the degradation path the framework uses
//! at display time: it never fails, and every degradation is recorded on the
//! configured [`AuditSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::audit::AuditSink;
use crate::audit::CatalogLoadEvent;
use crate::audit::NoopAuditSink;
use crate::audit::RenderFallbackEvent;
use crate::error::ResolveError;
use crate::key::KeyPath;
use crate::resolver::Params;
use crate::resolver::ResolveLimits;
use crate::resolver::ResolvedString;
use crate::resolver::Resolver;
use crate::table::StringTable;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Primary table plus shared tables, with resolution settings.
///
/// # Example
///
/// ```
/// use hub_strings_core::Catalog;
/// use hub_strings_core::StringTable;
///
/// let common = StringTable::load(
///     r#"{"common": {"config_flow": {"error": {"cannot_connect": "Failed to connect"}}}}"#,
/// )?;
/// let strings = StringTable::load(
///     r#"{"config": {"error": {"cannot_connect": "[%key:common::config_flow::error::cannot_connect%]"}}}"#,
/// )?;
/// let catalog = Catalog::new(strings).with_shared(common);
/// assert_eq!(
///     catalog.render("config.error.cannot_connect", hub_strings_core::NO_PARAMS)?,
///     "Failed to connect"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Catalog {
    /// Integration table consulted first.
    primary: Arc<StringTable>,
    /// Shared tables consulted in order after the primary.
    shared: Vec<Arc<StringTable>>,
    /// Bounds applied to each resolution.
    limits: ResolveLimits,
    /// Destination for load and fallback events.
    audit: Arc<dyn AuditSink>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("primary_keys", &self.primary.len())
            .field("shared_tables", &self.shared.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Creates a catalog over `primary` with no shared tables.
    #[must_use]
    pub fn new(primary: impl Into<Arc<StringTable>>) -> Self {
        Self {
            primary: primary.into(),
            shared: Vec::new(),
            limits: ResolveLimits::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Adds a shared table consulted after those already registered.
    #[must_use]
    pub fn with_shared(mut self, shared: impl Into<Arc<StringTable>>) -> Self {
        self.shared.push(shared.into());
        self
    }

    /// Overrides the redirect depth bound.
    #[must_use]
    pub fn with_max_redirect_depth(mut self, depth: usize) -> Self {
        self.limits.max_redirect_depth = depth;
        self
    }

    /// Overrides every resolution bound.
    #[must_use]
    pub fn with_limits(mut self, limits: ResolveLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Routes audit events to `sink`.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Returns the primary table.
    #[must_use]
    pub fn primary(&self) -> &StringTable {
        &self.primary
    }

    /// Returns the shared tables in lookup order.
    #[must_use]
    pub fn shared(&self) -> &[Arc<StringTable>] {
        &self.shared
    }

    /// Returns the redirect depth bound.
    #[must_use]
    pub const fn max_redirect_depth(&self) -> usize {
        self.limits.max_redirect_depth
    }

    /// Returns the resolution bounds in effect.
    #[must_use]
    pub const fn limits(&self) -> ResolveLimits {
        self.limits
    }

    /// Returns a borrowed resolver over this catalog's tables.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        let mut tables: Vec<&StringTable> = Vec::with_capacity(1 + self.shared.len());
        tables.push(&self.primary);
        tables.extend(self.shared.iter().map(|table| &**table));
        Resolver::with_tables(tables, self.limits)
    }

    /// Returns true when any table holds a leaf at `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        KeyPath::parse(key).is_ok_and(|path| self.resolver().lookup(&path).is_some())
    }

    /// Resolves `key` to a reference-free template.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the key is absent or its references are
    /// dangling or cyclic.
    pub fn resolve(&self, key: &str) -> Result<ResolvedString, ResolveError> {
        self.resolver().resolve(key)
    }

    /// Resolves `key` and substitutes placeholders from `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on resolution failure or a missing placeholder.
    pub fn render<P: Params + ?Sized>(&self, key: &str, params: &P) -> Result<String, ResolveError> {
        self.resolver().render(key, params)
    }

    /// Renders `key`, degrading instead of failing.
    ///
    /// Missing placeholders are left as `{name}` markers; any other failure
    /// yields `key` itself. Each degradation is recorded on the audit sink.
    #[must_use]
    pub fn render_or_fallback<P: Params + ?Sized>(&self, key: &str, params: &P) -> String {
        let resolved = match self.resolve(key) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.audit.record_fallback(&RenderFallbackEvent::new(key, &err));
                return key.to_string();
            }
        };
        match resolved.render(params) {
            Ok(text) => text,
            Err(err) => {
                self.audit.record_fallback(&RenderFallbackEvent::new(key, &err));
                resolved.render_lenient(params)
            }
        }
    }

    /// Resolves every leaf and returns every reference defect found.
    #[must_use]
    pub fn validate(&self) -> Vec<ResolveError> {
        self.resolver().validate()
    }

    /// Records a load event describing this catalog.
    pub fn record_load(&self, problems: usize) {
        let shared_keys = self.shared.iter().map(|table| table.len()).collect();
        self.audit.record_load(&CatalogLoadEvent::new(
            self.primary.len(),
            shared_keys,
            self.limits.max_redirect_depth,
            problems,
        ));
    }
}
