use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use droidcfg_util::errors::DroidcfgError;

use crate::dependency::{Configuration, DependencyRef};
use crate::floors::FloorDecl;
use crate::inherit::Inherited;
use crate::java::JavaVersion;
use crate::plugin::PluginRef;
use crate::signing::{BuildType, SigningConfig, DEBUG_PROFILE};

/// The parsed representation of a `Droidcfg.toml` file: the Build Target
/// Descriptor of one Android application target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub target: TargetSection,

    #[serde(
        default,
        rename = "compile-options",
        skip_serializing_if = "CompileOptions::is_empty"
    )]
    pub compile_options: CompileOptions,

    #[serde(default, rename = "kotlin-options", skip_serializing_if = "Option::is_none")]
    pub kotlin_options: Option<KotlinOptions>,

    #[serde(default, rename = "signing-configs", skip_serializing_if = "BTreeMap::is_empty")]
    pub signing_configs: BTreeMap<String, SigningConfig>,

    #[serde(default, rename = "build-types", skip_serializing_if = "BTreeMap::is_empty")]
    pub build_types: BTreeMap<String, BuildType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flutter: Option<FlutterSection>,

    #[serde(default, rename = "sdk-floors", skip_serializing_if = "BTreeMap::is_empty")]
    pub sdk_floors: BTreeMap<String, FloorDecl>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyRef>,
}

/// Identity, SDK levels and release identifiers from `[target]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSection {
    #[serde(rename = "application-id")]
    pub application_id: String,

    /// Compile-time code namespace. Defaults to the application id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(rename = "min-sdk")]
    pub min_sdk: Inherited<u32>,

    #[serde(rename = "target-sdk")]
    pub target_sdk: Inherited<u32>,

    #[serde(rename = "compile-sdk")]
    pub compile_sdk: Inherited<u32>,

    #[serde(default, rename = "ndk-version", skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<Inherited<String>>,

    #[serde(rename = "version-code")]
    pub version_code: Inherited<u32>,

    #[serde(rename = "version-name")]
    pub version_name: Inherited<String>,
}

/// Java compilation settings from `[compile-options]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(
        default,
        rename = "source-compatibility",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_compatibility: Option<JavaVersion>,

    #[serde(
        default,
        rename = "target-compatibility",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_compatibility: Option<JavaVersion>,

    /// Inject the core-library desugaring shim.
    #[serde(default, rename = "core-library-desugaring")]
    pub core_library_desugaring: bool,
}

impl CompileOptions {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Kotlin compilation settings from `[kotlin-options]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinOptions {
    #[serde(default, rename = "jvm-target", skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<JavaVersion>,
}

/// Flutter module settings from `[flutter]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlutterSection {
    /// Path from the Android app module to the Flutter project root.
    pub source: String,
}

impl Descriptor {
    /// Load and parse a `Droidcfg.toml` file from the given path.
    ///
    /// After parsing, `${env:VAR}` references in signing configs are resolved
    /// using `.droidcfg.env` (if present alongside the descriptor) and process
    /// environment variables.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let mut descriptor = Self::from_path_raw(path)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars = crate::properties::load_env_file(&dir.join(crate::ENV_FILE))?;
        descriptor.interpolate_secrets(&env_vars);
        Ok(descriptor)
    }

    /// Resolve `${env:VAR}` references in every signing config field.
    ///
    /// Values are substituted into parsed strings, so they may contain any
    /// character, TOML quoting included.
    pub fn interpolate_secrets(&mut self, env_vars: &BTreeMap<String, String>) {
        for config in self.signing_configs.values_mut() {
            for field in [
                &mut config.store_file,
                &mut config.store_password,
                &mut config.key_alias,
                &mut config.key_password,
            ] {
                if let Some(value) = field.as_mut() {
                    *value = crate::properties::interpolate(value, env_vars);
                }
            }
        }
    }

    /// Load a descriptor leaving `${env:VAR}` references untouched.
    pub fn from_path_raw(path: &Path) -> miette::Result<Self> {
        Self::from_str(&read_descriptor(path)?)
    }

    /// Parse a descriptor from a string (no interpolation).
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            DroidcfgError::Descriptor {
                message: format!("Failed to parse {}: {e}", crate::DESCRIPTOR_FILE),
            }
            .into()
        })
    }

    /// Serialize the descriptor to its TOML form.
    ///
    /// Parsing the result with [`Descriptor::from_str`] yields an equal descriptor.
    pub fn to_toml_string(&self) -> miette::Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            DroidcfgError::Descriptor {
                message: format!("Failed to serialize descriptor: {e}"),
            }
            .into()
        })
    }

    /// The namespace, falling back to the application id.
    pub fn namespace(&self) -> &str {
        self.target
            .namespace
            .as_deref()
            .unwrap_or(&self.target.application_id)
    }

    /// The signing profile applied to a build variant.
    ///
    /// The `debug` variant signs with the implicit debug profile unless its
    /// build type says otherwise. Other variants have no profile unless one
    /// is configured.
    pub fn signing_for(&self, variant: &str) -> Option<&str> {
        let configured = self
            .build_types
            .get(variant)
            .and_then(|bt| bt.signing_config.as_deref());
        match configured {
            Some(profile) => Some(profile),
            None if variant == DEBUG_PROFILE => Some(DEBUG_PROFILE),
            None => None,
        }
    }

    /// Dependencies declared in the given configuration, in declared order.
    pub fn dependencies_in(
        &self,
        configuration: Configuration,
    ) -> impl Iterator<Item = &DependencyRef> {
        self.dependencies
            .iter()
            .filter(move |d| d.configuration == configuration)
    }

    /// Every declared language level, labelled with the section it came from.
    pub fn language_levels(&self) -> Vec<(&'static str, JavaVersion)> {
        let mut levels = Vec::new();
        if let Some(v) = self.compile_options.source_compatibility {
            levels.push(("compile-options.source-compatibility", v));
        }
        if let Some(v) = self.compile_options.target_compatibility {
            levels.push(("compile-options.target-compatibility", v));
        }
        if let Some(v) = self.kotlin_options.as_ref().and_then(|k| k.jvm_target) {
            levels.push(("kotlin-options.jvm-target", v));
        }
        levels
    }
}

fn read_descriptor(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        DroidcfgError::Descriptor {
            message: format!("Failed to read {}: {e}", path.display()),
        }
        .into()
    })
}
