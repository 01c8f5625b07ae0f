// crates/hub-strings-config/src/config.rs
// ============================================================================
// Module: Hub Strings Configuration
// Description: Configuration loading and validation for Hub Strings.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: hub-strings-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! It names the resource documents to load and the limits applied while
//! loading and resolving them. Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use hub_strings_core::AuditSink;
use hub_strings_core::DEFAULT_MAX_EXPANSIONS;
use hub_strings_core::DEFAULT_MAX_OUTPUT_BYTES;
use hub_strings_core::DEFAULT_MAX_REDIRECT_DEPTH;
use hub_strings_core::FileAuditSink;
use hub_strings_core::LoadOptions;
use hub_strings_core::MalformedReferencePolicy;
use hub_strings_core::NoopAuditSink;
use hub_strings_core::ResolveLimits;
use hub_strings_core::StderrAuditSink;
use hub_strings_core::document::DEFAULT_MAX_DOCUMENT_BYTES;
use hub_strings_core::document::DEFAULT_MAX_NESTING_DEPTH;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "hub-strings.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "HUB_STRINGS_CONFIG";
/// Default primary resource document.
const DEFAULT_PRIMARY_SOURCE: &str = "strings.en.json";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of shared resource documents.
pub(crate) const MAX_SHARED_SOURCES: usize = 16;
/// Maximum allowed redirect depth.
pub(crate) const MAX_REDIRECT_DEPTH: usize = 64;
/// Maximum allowed entry visits per resolution.
pub(crate) const MAX_EXPANSIONS: usize = 65_536;
/// Maximum allowed resolved template size in bytes.
pub(crate) const MAX_OUTPUT_BYTES: usize = 16 * 1024 * 1024;
/// Maximum allowed resource document size in bytes.
pub(crate) const MAX_DOCUMENT_BYTES: usize = 64 * 1024 * 1024;
/// Maximum allowed namespace nesting depth (`serde_json` stops at 128).
pub(crate) const MAX_NESTING_DEPTH: usize = 100;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Hub Strings configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubStringsConfig {
    /// Resource documents to load.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Resolution settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Document loading limits and policies.
    #[serde(default)]
    pub load: LoadConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory of the config file; relative source paths resolve against it.
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl HubStringsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml(content)?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sources.validate()?;
        self.resolver.validate()?;
        self.load.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns where audit events go.
    ///
    /// Disabled audit discards events; an unset path logs to stderr.
    #[must_use]
    pub fn audit_destination(&self) -> AuditDestination {
        if !self.audit.enabled {
            return AuditDestination::Disabled;
        }
        match &self.audit.path {
            Some(path) => AuditDestination::File(self.resolve_source(path)),
            None => AuditDestination::Stderr,
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        match self.audit_destination() {
            AuditDestination::Disabled => Ok(Arc::new(NoopAuditSink)),
            AuditDestination::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditDestination::File(path) => {
                let sink = FileAuditSink::new(&path)
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Resolves a configured path against the config directory.
    #[must_use]
    pub fn resolve_source(&self, source: &str) -> PathBuf {
        let path = Path::new(source.trim());
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Resource document locations.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Integration strings document, consulted first.
    #[serde(default = "default_primary_source")]
    pub primary: String,
    /// Shared documents consulted in order after the primary.
    #[serde(default)]
    pub shared: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_source(),
            shared: Vec::new(),
        }
    }
}

impl SourcesConfig {
    /// Validates source paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("sources.primary", &self.primary)?;
        if self.shared.len() > MAX_SHARED_SOURCES {
            return Err(ConfigError::Invalid(format!(
                "sources.shared exceeds {MAX_SHARED_SOURCES} entries"
            )));
        }
        for (index, shared) in self.shared.iter().enumerate() {
            validate_path_string(&format!("sources.shared[{index}]"), shared)?;
            if shared.trim() == self.primary.trim() {
                return Err(ConfigError::Invalid(format!(
                    "sources.shared[{index}] duplicates sources.primary"
                )));
            }
            if let Some(first) =
                self.shared[.. index].iter().position(|earlier| earlier.trim() == shared.trim())
            {
                return Err(ConfigError::Invalid(format!(
                    "sources.shared[{index}] duplicates sources.shared[{first}]"
                )));
            }
        }
        Ok(())
    }
}

/// Resolution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Bound on nested redirect hops.
    #[serde(default = "default_max_redirect_depth")]
    pub max_redirect_depth: usize,
    /// Bound on entries visited while resolving one key.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
    /// Bound on resolved template size in bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_redirect_depth: default_max_redirect_depth(),
            max_expansions: default_max_expansions(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl ResolverConfig {
    /// Validates resolver settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_redirect_depth == 0 || self.max_redirect_depth > MAX_REDIRECT_DEPTH {
            return Err(ConfigError::Invalid("resolver.max_redirect_depth out of range".to_string()));
        }
        if self.max_expansions == 0 || self.max_expansions > MAX_EXPANSIONS {
            return Err(ConfigError::Invalid("resolver.max_expansions out of range".to_string()));
        }
        if self.max_output_bytes == 0 || self.max_output_bytes > MAX_OUTPUT_BYTES {
            return Err(ConfigError::Invalid("resolver.max_output_bytes out of range".to_string()));
        }
        Ok(())
    }

    /// Returns the core resolution limits for these settings.
    #[must_use]
    pub const fn limits(&self) -> ResolveLimits {
        ResolveLimits {
            max_redirect_depth: self.max_redirect_depth,
            max_expansions: self.max_expansions,
            max_output_bytes: self.max_output_bytes,
        }
    }
}

/// Document loading limits and policies.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// Maximum accepted document size in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Maximum namespace nesting depth.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Handling of malformed reference syntax.
    #[serde(default)]
    pub malformed_reference: MalformedReferencePolicy,
    /// Check every reference for cycles and missing targets at build time.
    #[serde(default = "default_validate_references")]
    pub validate_references: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            max_nesting_depth: default_max_nesting_depth(),
            malformed_reference: MalformedReferencePolicy::default(),
            validate_references: default_validate_references(),
        }
    }
}

impl LoadConfig {
    /// Validates load settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_document_bytes == 0 || self.max_document_bytes > MAX_DOCUMENT_BYTES {
            return Err(ConfigError::Invalid("load.max_document_bytes out of range".to_string()));
        }
        if self.max_nesting_depth == 0 || self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::Invalid("load.max_nesting_depth out of range".to_string()));
        }
        Ok(())
    }

    /// Returns the core load options for these settings.
    #[must_use]
    pub const fn options(&self) -> LoadOptions {
        LoadOptions {
            max_document_bytes: self.max_document_bytes,
            max_nesting_depth: self.max_nesting_depth,
            malformed_reference: self.malformed_reference,
        }
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

/// Resolved destination for audit events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditDestination {
    /// Events are discarded.
    Disabled,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File(PathBuf),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default primary source path.
fn default_primary_source() -> String {
    DEFAULT_PRIMARY_SOURCE.to_string()
}

/// Default redirect depth bound.
const fn default_max_redirect_depth() -> usize {
    DEFAULT_MAX_REDIRECT_DEPTH
}

/// Default entry visit bound.
const fn default_max_expansions() -> usize {
    DEFAULT_MAX_EXPANSIONS
}

/// Default resolved output bound.
const fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

/// Default document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Default nesting depth limit.
const fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

/// Reference validation is on unless disabled.
const fn default_validate_references() -> bool {
    true
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit path or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
