//! Core data types for droidcfg.
//!
//! This crate defines the Build Target Descriptor of an Android application
//! target and everything needed to reason about it without running the
//! external toolchain: inherited fields and the providers that supply them,
//! SDK floors imposed by dependencies, capability-tagged plugin activations,
//! validation with categorized errors and advisories, and rendering to the
//! Gradle Kotlin DSL.
//!
//! This crate is intentionally free of network I/O and never invokes Gradle.

/// File name of the descriptor looked up by the CLI.
pub const DESCRIPTOR_FILE: &str = "Droidcfg.toml";

/// File name of the per-project secrets file used for `${env:VAR}` interpolation.
pub const ENV_FILE: &str = ".droidcfg.env";

pub mod config;
pub mod dependency;
pub mod descriptor;
pub mod floors;
pub mod inherit;
pub mod java;
pub mod plugin;
pub mod properties;
pub mod provider;
pub mod render;
pub mod resolve;
pub mod signing;
pub mod template;
pub mod validate;
