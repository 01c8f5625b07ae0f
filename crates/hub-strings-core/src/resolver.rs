// crates/hub-strings-core/src/resolver.rs
// ============================================================================
// Module: Hub Strings Resolver
// Description: Bounded reference resolution and placeholder substitution.
// Purpose: Turn a key path into display text over one or more tables.
// Dependencies: crate::{table, template, key, error}
// ============================================================================

//! ## Overview
//! A [`Resolver`] borrows an ordered list of tables: the primary table first,
//! then shared tables. Lookups take the first table that holds a leaf at the
//! requested path.
//!
//! Resolution expands whole-value redirects and inline references into a flat
//! [`ResolvedString`] whose only remaining structure is placeholders. The walk
//! keeps the stack of keys being expanded; revisiting one of them, or nesting
//! deeper than `max_redirect_depth`, is a [`ResolveError::RedirectCycle`].
//!
//! Inline references may fan out, so a single walk also carries a budget of
//! entry visits and output bytes ([`ResolveLimits`]). Exhausting either is a
//! [`ResolveError::ExpansionLimit`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::error::ResolveError;
use crate::key::KeyPath;
use crate::table::StringTable;
use crate::template::LeafEntry;
use crate::template::Segment;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default bound on nested redirect hops.
pub const DEFAULT_MAX_REDIRECT_DEPTH: usize = 16;
/// Default bound on entries visited while resolving one key.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1024;
/// Default bound on resolved template size in bytes.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Empty parameter set for templates without placeholders.
pub const NO_PARAMS: &[(&str, &str)] = &[];

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Bounds applied to a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveLimits {
    /// Maximum nested redirect hops.
    pub max_redirect_depth: usize,
    /// Maximum entries visited, counting every inline reference occurrence.
    pub max_expansions: usize,
    /// Maximum bytes of resolved text and placeholder names.
    pub max_output_bytes: usize,
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self {
            max_redirect_depth: DEFAULT_MAX_REDIRECT_DEPTH,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Source of placeholder values for rendering.
pub trait Params {
    /// Returns the value for placeholder `name`.
    fn param(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> Params for HashMap<String, String, S> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Params for BTreeMap<String, String> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Params for [(&str, &str)] {
    fn param(&self, name: &str) -> Option<&str> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }
}

impl<const N: usize> Params for [(&str, &str); N] {
    fn param(&self, name: &str) -> Option<&str> {
        self.as_slice().param(name)
    }
}

// ============================================================================
// SECTION: Resolved Strings
// ============================================================================

/// A piece of a fully resolved template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSegment {
    /// Literal display text.
    Text(String),
    /// Placeholder still awaiting a value.
    Placeholder(String),
}

/// A template with every reference expanded and placeholders intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedString {
    /// Key the caller asked for.
    key: KeyPath,
    /// Key whose entry supplied the outermost template.
    origin: KeyPath,
    /// Flattened segments.
    segments: Vec<ResolvedSegment>,
}

impl ResolvedString {
    /// Returns the requested key.
    #[must_use]
    pub const fn key(&self) -> &KeyPath {
        &self.key
    }

    /// Returns the key that finally supplied the template.
    ///
    /// Equal to [`Self::key`] unless the requested entry was a redirect.
    #[must_use]
    pub const fn origin(&self) -> &KeyPath {
        &self.origin
    }

    /// Returns the flattened segments.
    #[must_use]
    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }

    /// Returns the template text with `{name}` placeholders intact.
    #[must_use]
    pub fn template_text(&self) -> String {
        self.render_with(|_| None)
    }

    /// Returns distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let ResolvedSegment::Placeholder(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Substitutes every placeholder from `params`.
    ///
    /// Parameters the template does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingPlaceholder`] for the first placeholder
    /// without a value.
    pub fn render<P: Params + ?Sized>(&self, params: &P) -> Result<String, ResolveError> {
        let missing = self.placeholders().into_iter().find(|name| params.param(name).is_none());
        if let Some(missing) = missing {
            return Err(ResolveError::MissingPlaceholder {
                key: self.key.clone(),
                placeholder: missing.to_string(),
            });
        }
        Ok(self.render_with(|name| params.param(name)))
    }

    /// Substitutes known placeholders and leaves the rest as `{name}` markers.
    #[must_use]
    pub fn render_lenient<P: Params + ?Sized>(&self, params: &P) -> String {
        self.render_with(|name| params.param(name))
    }

    /// Renders segments, asking `value` for each placeholder.
    fn render_with<'p>(&self, value: impl Fn(&str) -> Option<&'p str>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                ResolvedSegment::Text(text) => out.push_str(text),
                ResolvedSegment::Placeholder(name) => match value(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Borrowed view over tables in lookup order.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    /// Tables in lookup order, primary first.
    tables: Vec<&'a StringTable>,
    /// Bounds applied to each resolution.
    limits: ResolveLimits,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a single table.
    #[must_use]
    pub fn new(primary: &'a StringTable) -> Self {
        Self {
            tables: vec![primary],
            limits: ResolveLimits::default(),
        }
    }

    /// Creates a resolver over tables given in lookup order.
    #[must_use]
    pub const fn with_tables(tables: Vec<&'a StringTable>, limits: ResolveLimits) -> Self {
        Self {
            tables,
            limits,
        }
    }

    /// Appends a shared table consulted after the existing ones.
    #[must_use]
    pub fn with_shared(mut self, shared: &'a StringTable) -> Self {
        self.tables.push(shared);
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

    /// Returns the resolution bounds in effect.
    #[must_use]
    pub const fn limits(&self) -> ResolveLimits {
        self.limits
    }

    /// Returns the first leaf entry at `path` across tables.
    #[must_use]
    pub fn lookup(&self, path: &KeyPath) -> Option<&'a LeafEntry> {
        self.tables.iter().copied().find_map(|table| table.get(path))
    }

    /// Resolves a dotted key into a reference-free template.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::KeyNotFound`] when no leaf exists at `key`,
    /// [`ResolveError::DanglingReference`] when a reference target is missing,
    /// [`ResolveError::RedirectCycle`] on cycles or excessive depth, and
    /// [`ResolveError::ExpansionLimit`] when the expansion budget runs out.
    pub fn resolve(&self, key: &str) -> Result<ResolvedString, ResolveError> {
        let path = KeyPath::parse(key).map_err(|_| ResolveError::KeyNotFound {
            key: key.to_string(),
        })?;
        if self.lookup(&path).is_none() {
            return Err(ResolveError::KeyNotFound {
                key: key.to_string(),
            });
        }
        self.resolve_path(&path)
    }

    /// Resolves an already-parsed key path.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub fn resolve_path(&self, path: &KeyPath) -> Result<ResolvedString, ResolveError> {
        let mut walk = Walk {
            requested: path,
            stack: Vec::new(),
            segments: Vec::new(),
            visits: 0,
            output_bytes: 0,
        };
        let origin = self.expand(&mut walk, path)?;
        Ok(ResolvedString {
            key: path.clone(),
            origin,
            segments: walk.segments,
        })
    }

    /// Resolves and renders `key` with `params`.
    ///
    /// # Errors
    ///
    /// Returns any [`Self::resolve`] error, or
    /// [`ResolveError::MissingPlaceholder`] when `params` lacks a value.
    pub fn render<P: Params + ?Sized>(&self, key: &str, params: &P) -> Result<String, ResolveError> {
        self.resolve(key)?.render(params)
    }

    /// Resolves every leaf of every table and collects the failures.
    #[must_use]
    pub fn validate(&self) -> Vec<ResolveError> {
        let mut problems = Vec::new();
        for table in &self.tables {
            for (path, _) in table.entries() {
                if let Err(err) = self.resolve_path(&path) {
                    problems.push(err);
                }
            }
        }
        problems
    }

    /// Expands `current` into `walk`, returning the key that supplied the
    /// template.
    fn expand(&self, walk: &mut Walk<'_>, current: &KeyPath) -> Result<KeyPath, ResolveError> {
        if walk.stack.contains(current) || walk.stack.len() > self.limits.max_redirect_depth {
            let mut chain = walk.stack.clone();
            chain.push(current.clone());
            return Err(ResolveError::RedirectCycle {
                key: walk.requested.clone(),
                chain,
            });
        }
        let Some(entry) = self.lookup(current) else {
            return Err(match walk.stack.last() {
                Some(parent) => ResolveError::DanglingReference {
                    key: parent.clone(),
                    target: current.clone(),
                },
                None => ResolveError::KeyNotFound {
                    key: current.to_string(),
                },
            });
        };
        walk.visits += 1;
        if walk.visits > self.limits.max_expansions {
            return Err(ResolveError::ExpansionLimit {
                key: walk.requested.clone(),
                limit: self.limits.max_expansions,
                unit: "entry visits",
            });
        }
        walk.stack.push(current.clone());
        let origin = match entry {
            LeafEntry::Redirect(target) => self.expand(walk, target)?,
            LeafEntry::Literal(template) => {
                for segment in template.segments() {
                    match segment {
                        Segment::Text(text) => {
                            self.charge_output(walk, text.len())?;
                            walk.push_text(text);
                        }
                        Segment::Placeholder(name) => {
                            self.charge_output(walk, name.len())?;
                            walk.segments.push(ResolvedSegment::Placeholder(name.clone()));
                        }
                        Segment::Reference(target) => {
                            self.expand(walk, target)?;
                        }
                    }
                }
                current.clone()
            }
        };
        walk.stack.pop();
        Ok(origin)
    }

    /// Adds `bytes` to the walk's output size, failing past the bound.
    fn charge_output(&self, walk: &mut Walk<'_>, bytes: usize) -> Result<(), ResolveError> {
        walk.output_bytes = walk.output_bytes.saturating_add(bytes);
        if walk.output_bytes > self.limits.max_output_bytes {
            return Err(ResolveError::ExpansionLimit {
                key: walk.requested.clone(),
                limit: self.limits.max_output_bytes,
                unit: "output bytes",
            });
        }
        Ok(())
    }
}

/// Mutable state of one resolution.
struct Walk<'k> {
    /// Key the caller asked for.
    requested: &'k KeyPath,
    /// Keys currently being expanded, outermost first.
    stack: Vec<KeyPath>,
    /// Output segments.
    segments: Vec<ResolvedSegment>,
    /// Entries visited so far.
    visits: usize,
    /// Bytes of text and placeholder names emitted so far.
    output_bytes: usize,
}

impl Walk<'_> {
    /// Appends text, merging with a preceding text segment.
    fn push_text(&mut self, text: &str) {
        if let Some(ResolvedSegment::Text(previous)) = self.segments.last_mut() {
            previous.push_str(text);
        } else {
            self.segments.push(ResolvedSegment::Text(text.to_string()));
        }
    }
}
