// crates/hub-strings-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Hub Strings configuration. The output is
//! deterministic and kept valid by the config test suite.

/// Returns a canonical example `hub-strings.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[sources]
primary = "strings.en.json"
shared = ["common.en.json"]

[resolver]
max_redirect_depth = 16
max_expansions = 1024
max_output_bytes = 65536

[load]
max_document_bytes = 4194304
max_nesting_depth = 32
malformed_reference = "reject"
validate_references = true

[audit]
enabled = true
# path = "hub-strings-audit.log"
"#,
    )
}
