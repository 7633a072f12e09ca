//! Shared-version providers.
//!
//! Inherited descriptor fields (`{ inherit = "flutter.versionCode" }`) are
//! resolved against a [`VersionProvider`] passed in by the caller, never
//! against global state. Tests substitute a [`MapProvider`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use droidcfg_util::errors::DroidcfgError;

use crate::config::FlutterDefaults;
use crate::properties::load_properties;

/// A source of shared values keyed by dotted names (`flutter.versionName`).
pub trait VersionProvider {
    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str;

    fn lookup(&self, key: &str) -> Option<String>;
}

/// In-memory provider.
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    name: String,
    values: BTreeMap<String, String>,
}

impl MapProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Build a provider from `key=value` assignments (the CLI `--set` flag).
    pub fn from_assignments<'a>(
        name: impl Into<String>,
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> miette::Result<Self> {
        let mut provider = Self::new(name);
        for assignment in assignments {
            let (key, value) =
                assignment
                    .split_once('=')
                    .ok_or_else(|| DroidcfgError::Provider {
                        message: format!("Expected key=value, got '{assignment}'"),
                    })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(DroidcfgError::Provider {
                    message: format!("Empty key in '{assignment}'"),
                }
                .into());
            }
            provider.insert(key, value.trim());
        }
        Ok(provider)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VersionProvider for MapProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// The values a Flutter project exposes to its Android module.
///
/// `flutter.versionCode` / `flutter.versionName` / `flutter.sdk` come from
/// `local.properties`, which `flutter build` regenerates from `pubspec.yaml`.
/// The SDK constants (`flutter.compileSdkVersion`, ...) come from
/// [`FlutterDefaults`].
#[derive(Debug, Clone)]
pub struct FlutterProvider {
    name: String,
    properties: BTreeMap<String, String>,
    defaults: FlutterDefaults,
}

impl FlutterProvider {
    pub fn from_parts(properties: BTreeMap<String, String>, defaults: FlutterDefaults) -> Self {
        Self {
            name: "Flutter".to_string(),
            properties,
            defaults,
        }
    }

    /// Load `local.properties` from `path`. A missing file leaves only the
    /// SDK constants available.
    pub fn load(path: &Path, defaults: FlutterDefaults) -> miette::Result<Self> {
        let properties = load_properties(path)?;
        if properties.is_empty() {
            tracing::warn!("No Flutter properties found at {}", path.display());
        } else {
            tracing::debug!(
                "Loaded {} Flutter properties from {}",
                properties.len(),
                path.display()
            );
        }
        Ok(Self {
            name: format!("Flutter ({})", path.display()),
            properties,
            defaults,
        })
    }

    /// Where `local.properties` lives for a descriptor in `descriptor_dir`:
    /// next to it, or in its parent (the Gradle root of `android/app`).
    pub fn locate(descriptor_dir: &Path) -> Option<PathBuf> {
        [
            descriptor_dir.join("local.properties"),
            descriptor_dir.join("..").join("local.properties"),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }
}

impl VersionProvider for FlutterProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.properties
            .get(key)
            .cloned()
            .or_else(|| self.defaults.lookup(key))
    }
}

/// Consults providers in order and returns the first hit.
#[derive(Default)]
pub struct ChainProvider {
    providers: Vec<Box<dyn VersionProvider>>,
    name: String,
}

impl ChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: impl VersionProvider + 'static) {
        self.providers.push(Box::new(provider));
        self.name = self
            .providers
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(" > ");
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl VersionProvider for ChainProvider {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            "no providers"
        } else {
            &self.name
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|p| p.lookup(key))
    }
}
