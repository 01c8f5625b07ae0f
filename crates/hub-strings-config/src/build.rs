// crates/hub-strings-config/src/build.rs
// ============================================================================
// Module: Catalog Construction
// Description: Loads configured resource documents into a validated catalog.
// Purpose: One-time, fail-closed startup step for the consuming framework.
// Dependencies: hub-strings-core, thiserror
// ============================================================================

//! ## Overview
//! [`build_catalog`] reads the primary and shared documents named by a
//! [`HubStringsConfig`], loads them with the configured limits, and, unless
//! disabled, validates every reference before handing the catalog back. Any
//! failure aborts construction; there is no partially loaded catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hub_strings_core::Catalog;
use hub_strings_core::LoadError;
use hub_strings_core::LoadOptions;
use hub_strings_core::ResolveError;
use hub_strings_core::StringTable;
use thiserror::Error;

use crate::config::ConfigError;
use crate::config::HubStringsConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a catalog from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration was invalid or the audit sink could not be opened.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A resource document could not be read.
    #[error("failed to read `{}`: {message}", .path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
    /// A resource document failed to load.
    #[error("failed to load `{}`: {source}", .path.display())]
    Load {
        /// Document path.
        path: PathBuf,
        /// Load failure.
        source: LoadError,
    },
    /// Reference validation found dangling references or cycles.
    #[error("catalog has {} invalid reference(s); first: {}", .problems.len(), first_problem(.problems))]
    Validation {
        /// Every problem found.
        problems: Vec<ResolveError>,
    },
}

/// Formats the first validation problem for display.
fn first_problem(problems: &[ResolveError]) -> String {
    problems.first().map_or_else(String::new, ToString::to_string)
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds a catalog from configuration.
///
/// # Errors
///
/// Returns [`BuildError`] when the configuration is invalid, a document cannot
/// be read or loaded, or reference validation fails.
pub fn build_catalog(config: &HubStringsConfig) -> Result<Catalog, BuildError> {
    config.validate()?;
    let options = config.load.options();
    let primary = load_table(&config.resolve_source(&config.sources.primary), &options)?;
    let mut catalog = Catalog::new(primary)
        .with_limits(config.resolver.limits())
        .with_audit_sink(config.audit_sink()?);
    for shared in &config.sources.shared {
        catalog = catalog.with_shared(load_table(&config.resolve_source(shared), &options)?);
    }
    if config.load.validate_references {
        let problems = catalog.validate();
        catalog.record_load(problems.len());
        if !problems.is_empty() {
            return Err(BuildError::Validation {
                problems,
            });
        }
    } else {
        catalog.record_load(0);
    }
    Ok(catalog)
}

/// Reads and loads one resource document.
///
/// # Errors
///
/// Returns [`BuildError::Io`] on read failure and [`BuildError::Load`] when
/// the document is oversized or malformed.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<StringTable, BuildError> {
    let io_error = |err: std::io::Error| BuildError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if !usize::try_from(size).is_ok_and(|size| size <= options.max_document_bytes) {
        return Err(BuildError::Load {
            path: path.to_path_buf(),
            source: LoadError::malformed(format!(
                "document is {size} bytes, limit is {}",
                options.max_document_bytes
            )),
        });
    }
    let bytes = fs::read(path).map_err(io_error)?;
    StringTable::load_with(&bytes, options).map_err(|source| BuildError::Load {
        path: path.to_path_buf(),
        source,
    })
}

impl HubStringsConfig {
    /// Builds a catalog from this configuration.
    ///
    /// # Errors
    ///
    /// See [`build_catalog`].
    pub fn build_catalog(&self) -> Result<Catalog, BuildError> {
        build_catalog(self)
    }
}
