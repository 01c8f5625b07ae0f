// crates/hub-strings-core/tests/load.rs
// ============================================================================
// Module: Document Load Tests
// Description: Structural validation performed while loading a document.
// ============================================================================
//! ## Overview
//! Covers well-formed loads, duplicate keys reported with their full path, and
//! each malformed-document condition.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use hub_strings_core::KeyPath;
use hub_strings_core::LeafEntry;
use hub_strings_core::LoadError;
use hub_strings_core::LoadOptions;
use hub_strings_core::MalformedReferencePolicy;
use hub_strings_core::StringTable;
use hub_strings_core::load;
use hub_strings_core::resolve;
use support::TestResult;
use support::ensure;

fn path(text: &str) -> KeyPath {
    KeyPath::parse(text).expect("valid key path")
}

#[test]
fn loads_nested_namespaces() -> TestResult {
    let table = load(
        r#"{
            "config": {
                "step": {
                    "user": {"title": "Pick a port", "data": {"path": "Serial device path"}}
                },
                "error": {"cannot_connect": "[%key:common::config_flow::error::cannot_connect%]"}
            }
        }"#,
    )?;
    ensure(table.len() == 3, format!("expected 3 leaves, got {}", table.len()))?;
    ensure(table.namespace(&path("config.step.user")).is_some(), "user step namespace")?;
    ensure(
        table.get(&path("config.error.cannot_connect"))
            == Some(&LeafEntry::Redirect(path("common.config_flow.error.cannot_connect"))),
        "redirect tagged at parse time",
    )?;
    ensure(table.get(&path("config.step")).is_none(), "namespace is not a leaf")?;
    Ok(())
}

#[test]
fn keys_are_sorted_dotted_paths() -> TestResult {
    let table = load(r#"{"b": {"y": "1", "x": "2"}, "a": "3"}"#)?;
    let keys: Vec<String> = table.keys().iter().map(ToString::to_string).collect();
    ensure(keys == ["a", "b.x", "b.y"], format!("unexpected keys {keys:?}"))?;
    Ok(())
}

#[test]
fn empty_document_is_valid() -> TestResult {
    let table = load("{}")?;
    ensure(table.is_empty(), "empty document has no leaves")?;
    Ok(())
}

#[test]
fn duplicate_key_reports_full_path() {
    let err = load(r#"{"config": {"step": {"user": {"title": "a", "title": "b"}}}}"#).unwrap_err();
    assert_eq!(
        err,
        LoadError::DuplicateKey {
            path: path("config.step.user.title"),
        }
    );
}

#[test]
fn duplicate_namespace_is_rejected() {
    let err = load(r#"{"config": {"a": "1"}, "config": {"b": "2"}}"#).unwrap_err();
    assert_eq!(
        err,
        LoadError::DuplicateKey {
            path: path("config"),
        }
    );
}

#[test]
fn same_key_in_different_namespaces_is_allowed() -> TestResult {
    let table = load(r#"{"config": {"title": "a"}, "options": {"title": "b"}}"#)?;
    ensure(table.len() == 2, "both titles kept")?;
    Ok(())
}

#[test]
fn invalid_json_is_malformed() {
    let err = load(r#"{"config": "#).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { path: None, .. }));
}

#[test]
fn non_object_root_is_malformed() {
    for source in [r#""text""#, "[]", "42", "null"] {
        let err = load(source).unwrap_err();
        assert!(
            err.to_string().contains("root must be an object"),
            "unexpected error for {source}: {err}"
        );
    }
}

#[test]
fn non_string_leaf_is_malformed_with_location() {
    let cases = [
        (r#"{"config": {"port": 8080}}"#, "number"),
        (r#"{"config": {"port": true}}"#, "boolean"),
        (r#"{"config": {"port": null}}"#, "null"),
        (r#"{"config": {"port": ["a"]}}"#, "array"),
    ];
    for (source, kind) in cases {
        let err = load(source).unwrap_err();
        match err {
            LoadError::Malformed {
                path: Some(location),
                reason,
            } => {
                assert_eq!(location, path("config.port"));
                assert!(reason.contains(kind), "reason `{reason}` should mention {kind}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn unaddressable_keys_are_malformed() {
    for source in [r#"{"": "x"}"#, r#"{"a.b": "x"}"#, r#"{"config": {"a::b": "x"}}"#] {
        let err = load(source).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "expected malformed for {source}");
    }
}

#[test]
fn padded_keys_are_malformed() {
    for source in [r#"{" title": "Hello"}"#, r#"{"config": {"name ": "N"}}"#] {
        let err = load(source).unwrap_err();
        assert!(
            err.to_string().contains("leading or trailing whitespace"),
            "unexpected error for {source}: {err}"
        );
    }
}

#[test]
fn every_loaded_key_resolves_by_its_dotted_form() -> TestResult {
    let table = load(
        r#"{"title": "Hello", "config": {"two words": "N", "step": {"user": {"title": "[%key:title%]"}}}}"#,
    )?;
    for key in table.keys() {
        let resolved = resolve(&table, &key.to_string())?;
        ensure(resolved.key() == &key, format!("resolved wrong key for {key}"))?;
    }
    ensure(table.len() == 3, "three leaves loaded")?;
    Ok(())
}

#[test]
fn malformed_reference_rejected_by_default() {
    let err = load(r#"{"config": {"error": {"x": "[%key:common::config_flow"}}}"#).unwrap_err();
    match err {
        LoadError::Malformed {
            path: Some(location),
            reason,
        } => {
            assert_eq!(location, path("config.error.x"));
            assert!(reason.contains("unterminated reference"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn malformed_reference_kept_under_literal_policy() -> TestResult {
    let options = LoadOptions {
        malformed_reference: MalformedReferencePolicy::Literal,
        ..LoadOptions::default()
    };
    let table =
        StringTable::load_with(br#"{"x": "[%key:common::config_flow"}"#, &options)?;
    let entry = table.get(&path("x")).ok_or("missing x")?;
    ensure(
        entry.source_text() == "[%key:common::config_flow",
        format!("unexpected text {}", entry.source_text()),
    )?;
    Ok(())
}

#[test]
fn oversized_document_is_malformed() {
    let options = LoadOptions {
        max_document_bytes: 8,
        ..LoadOptions::default()
    };
    let err = StringTable::load_with(br#"{"a": "0123456789"}"#, &options).unwrap_err();
    assert!(err.to_string().contains("limit is 8"));
}

#[test]
fn nesting_beyond_limit_is_malformed() {
    let options = LoadOptions {
        max_nesting_depth: 2,
        ..LoadOptions::default()
    };
    assert!(StringTable::load_with(br#"{"a": {"b": "ok"}}"#, &options).is_ok());
    let err = StringTable::load_with(br#"{"a": {"b": {"c": "deep"}}}"#, &options).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { path: Some(_), .. }));
}

#[test]
fn invalid_utf8_is_malformed() {
    let err = StringTable::load_with(b"{\"a\": \"\xff\"}", &LoadOptions::default()).unwrap_err();
    assert_eq!(err, LoadError::malformed("document must be utf-8"));
}
