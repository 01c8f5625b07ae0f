//! Config load validation tests for hub-strings-config.
// crates/hub-strings-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test-only failure messages use debug output.")]

use std::io::Write;
use std::path::Path;

use hub_strings_config::AuditDestination;
use hub_strings_config::HubStringsConfig;
use tempfile::NamedTempFile;
use tempfile::TempDir;

mod common;

type TestResult = Result<(), String>;

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    common::assert_invalid(HubStringsConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    common::assert_invalid(HubStringsConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    common::assert_invalid(
        HubStringsConfig::load(Some(file.path())),
        "config file exceeds size limit",
    )?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    common::assert_invalid(HubStringsConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_invalid_toml() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[resolver\nmax_redirect_depth = 4").map_err(|err| err.to_string())?;
    common::assert_invalid(HubStringsConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_validates_after_parsing() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[resolver]\nmax_redirect_depth = 0\n").map_err(|err| err.to_string())?;
    common::assert_invalid(
        HubStringsConfig::load(Some(file.path())),
        "resolver.max_redirect_depth out of range",
    )?;
    Ok(())
}

#[test]
fn load_reports_missing_file() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let missing = dir.path().join("absent.toml");
    common::assert_invalid(HubStringsConfig::load(Some(&missing)), "config io error")?;
    Ok(())
}

#[test]
fn relative_sources_resolve_against_config_dir() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let config_path = common::write_file(
        dir.path(),
        "hub-strings.toml",
        "[sources]\nprimary = \"strings.en.json\"\nshared = [\"/abs/common.en.json\"]\n",
    )?;
    let config = HubStringsConfig::load(Some(&config_path)).map_err(|err| err.to_string())?;
    if config.resolve_source(&config.sources.primary) != dir.path().join("strings.en.json") {
        return Err("relative primary should resolve under the config dir".to_string());
    }
    if config.resolve_source(&config.sources.shared[0]) != Path::new("/abs/common.en.json") {
        return Err("absolute shared path should be kept".to_string());
    }
    Ok(())
}

#[test]
fn audit_defaults_to_stderr() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.audit_destination() != AuditDestination::Stderr {
        return Err(format!("unexpected destination {:?}", config.audit_destination()));
    }
    config.audit_sink().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn disabled_audit_ignores_path() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let config_path = common::write_file(
        dir.path(),
        "hub-strings.toml",
        "[audit]\nenabled = false\npath = \"audit.jsonl\"\n",
    )?;
    let config = HubStringsConfig::load(Some(&config_path)).map_err(|err| err.to_string())?;
    if config.audit_destination() != AuditDestination::Disabled {
        return Err(format!("unexpected destination {:?}", config.audit_destination()));
    }
    config.audit_sink().map_err(|err| err.to_string())?;
    if dir.path().join("audit.jsonl").exists() {
        return Err("disabled audit must not create the log file".to_string());
    }
    Ok(())
}

#[test]
fn audit_path_resolves_against_config_dir() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let config_path =
        common::write_file(dir.path(), "hub-strings.toml", "[audit]\npath = \"audit.jsonl\"\n")?;
    let config = HubStringsConfig::load(Some(&config_path)).map_err(|err| err.to_string())?;
    let expected = AuditDestination::File(dir.path().join("audit.jsonl"));
    if config.audit_destination() != expected {
        return Err(format!("unexpected destination {:?}", config.audit_destination()));
    }
    config.audit_sink().map_err(|err| err.to_string())?;
    if !dir.path().join("audit.jsonl").exists() {
        return Err("file audit sink should create the log file".to_string());
    }
    Ok(())
}
