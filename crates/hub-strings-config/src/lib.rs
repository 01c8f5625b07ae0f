// crates/hub-strings-config/src/lib.rs
// ============================================================================
// Module: Hub Strings Config Library
// Description: Canonical config model, validation, and catalog construction.
// Purpose: Single source of truth for hub-strings.toml semantics.
// Dependencies: hub-strings-core, serde, toml
// ============================================================================

//! ## Overview
//! `hub-strings-config` defines the configuration model for Hub Strings and
//! turns a validated configuration into a ready [`hub_strings_core::Catalog`].
//! Validation is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod build;
pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use build::BuildError;
pub use build::build_catalog;
pub use build::load_table;
pub use config::*;
pub use examples::config_toml_example;
