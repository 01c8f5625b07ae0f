// crates/hub-strings-core/src/audit.rs
// ============================================================================
// Module: Hub Strings Audit Logging
// Description: Structured events for catalog loads and degraded renders.
// Purpose: Emit JSON-line logs without hard dependencies on a log pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Catalog construction and fallback rendering report through an
//! [`AuditSink`]. Events serialize to one JSON object per line so deployments
//! can route them to whatever log pipeline they already run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::ResolveError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity attached to an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    /// Normal lifecycle event.
    Info,
    /// Recoverable degradation.
    Warn,
    /// Authoring bug surfaced at runtime.
    Error,
}

/// Emitted when a catalog is assembled.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogLoadEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Leaf count of the primary table.
    pub primary_keys: usize,
    /// Leaf count of each shared table, in lookup order.
    pub shared_keys: Vec<usize>,
    /// Maximum redirect depth in effect.
    pub max_redirect_depth: usize,
    /// Number of validation problems found (0 when validation was skipped).
    pub problems: usize,
    /// `error` when problems were found, otherwise `info`.
    pub severity: AuditSeverity,
}

impl CatalogLoadEvent {
    /// Creates a load event with a consistent timestamp.
    #[must_use]
    pub fn new(
        primary_keys: usize,
        shared_keys: Vec<usize>,
        max_redirect_depth: usize,
        problems: usize,
    ) -> Self {
        Self {
            event: "catalog_load",
            timestamp_ms: now_ms(),
            primary_keys,
            shared_keys,
            max_redirect_depth,
            problems,
            severity: if problems == 0 { AuditSeverity::Info } else { AuditSeverity::Error },
        }
    }
}

/// Emitted when a render degraded to a fallback string.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFallbackEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Requested key as given by the caller.
    pub key: String,
    /// Error kind label.
    pub error_kind: &'static str,
    /// Full error message.
    pub message: String,
    /// Severity derived from recoverability.
    pub severity: AuditSeverity,
}

impl RenderFallbackEvent {
    /// Creates a fallback event for `key` caused by `error`.
    #[must_use]
    pub fn new(key: &str, error: &ResolveError) -> Self {
        let severity =
            if error.is_recoverable() { AuditSeverity::Warn } else { AuditSeverity::Error };
        Self {
            event: "render_fallback",
            timestamp_ms: now_ms(),
            key: key.to_string(),
            error_kind: error.kind(),
            message: error.to_string(),
            severity,
        }
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for catalog events.
pub trait AuditSink: Send + Sync {
    /// Record a catalog load event.
    fn record_load(&self, event: &CatalogLoadEvent);

    /// Record a render fallback event.
    fn record_fallback(&self, event: &RenderFallbackEvent);
}

/// Audit sink that discards events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_load(&self, _event: &CatalogLoadEvent) {}

    fn record_fallback(&self, _event: &RenderFallbackEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_load(&self, event: &CatalogLoadEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_fallback(&self, event: &RenderFallbackEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one serialized event line.
    fn write_line<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_load(&self, event: &CatalogLoadEvent) {
        self.write_line(event);
    }

    fn record_fallback(&self, event: &RenderFallbackEvent) {
        self.write_line(event);
    }
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
    use crate::key::KeyPath;

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let sink = FileAuditSink::new(&path).unwrap();
        sink.record_load(&CatalogLoadEvent::new(3, vec![2], 16, 0));
        let error = ResolveError::KeyNotFound {
            key: "config.step.user.title".to_string(),
        };
        sink.record_fallback(&RenderFallbackEvent::new("config.step.user.title", &error));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "catalog_load");
        assert_eq!(lines[0]["primary_keys"], 3);
        assert_eq!(lines[0]["severity"], "info");
        assert_eq!(lines[1]["event"], "render_fallback");
        assert_eq!(lines[1]["error_kind"], "key_not_found");
        assert_eq!(lines[1]["severity"], "warn");
    }

    #[test]
    fn unrecoverable_errors_are_error_severity() {
        let key = KeyPath::parse("a").unwrap();
        let error = ResolveError::RedirectCycle {
            key: key.clone(),
            chain: vec![key.clone(), key.clone()],
        };
        let event = RenderFallbackEvent::new("a", &error);
        assert_eq!(event.severity, AuditSeverity::Error);
        assert_eq!(event.error_kind, "redirect_cycle");
    }
}
