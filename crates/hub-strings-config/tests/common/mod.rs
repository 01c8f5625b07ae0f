// crates/hub-strings-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for hub-strings-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hub_strings_config::ConfigError;
use hub_strings_config::HubStringsConfig;
use tempfile::TempDir;

/// Integration strings document shipped with the workspace.
pub const STRINGS_EN: &str = include_str!("../../../../resources/strings.en.json");
/// Shared common strings document shipped with the workspace.
pub const COMMON_EN: &str = include_str!("../../../../resources/common.en.json");

/// Parses a TOML string into a `HubStringsConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<HubStringsConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<HubStringsConfig, toml::de::Error> {
    config_from_toml("")
}

/// Writes `content` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Creates a temp directory holding the bundled documents and `config_toml`.
///
/// Returns the directory guard and the config file path.
pub fn bundled_workspace(config_toml: &str) -> Result<(TempDir, PathBuf), String> {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    write_file(dir.path(), "strings.en.json", STRINGS_EN)?;
    write_file(dir.path(), "common.en.json", COMMON_EN)?;
    let config_path = write_file(dir.path(), "hub-strings.toml", config_toml)?;
    Ok((dir, config_path))
}

/// Assert that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
