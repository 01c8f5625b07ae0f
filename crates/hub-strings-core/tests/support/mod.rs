// crates/hub-strings-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures and result helpers for core integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers: bundled resource fixtures and Result-based assertions.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;

use hub_strings_core::Catalog;
use hub_strings_core::StringTable;

// ========================================================================
// Fixtures
// ========================================================================

/// Integration strings document shipped with the workspace.
pub const STRINGS_EN: &str = include_str!("../../../../resources/strings.en.json");
/// Shared common strings document shipped with the workspace.
pub const COMMON_EN: &str = include_str!("../../../../resources/common.en.json");

/// Loads the bundled integration and common tables into a catalog.
pub fn bundled_catalog() -> TestResult<Catalog> {
    let strings = StringTable::load(STRINGS_EN)?;
    let common = StringTable::load(COMMON_EN)?;
    Ok(Catalog::new(strings).with_shared(common))
}

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}
