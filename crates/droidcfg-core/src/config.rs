use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use droidcfg_util::errors::DroidcfgError;

use crate::floors::FloorDecl;

/// Global user configuration loaded from `~/.droidcfg/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub flutter: FlutterDefaults,

    /// Extra SDK floors keyed by `group:artifact`.
    #[serde(default)]
    pub floors: BTreeMap<String, FloorDecl>,
}

/// SDK constants the Flutter Gradle Plugin exposes as `flutter.*` properties.
///
/// These track the values shipped with the Flutter SDK and can be
/// overridden in `[flutter]` when a project pins an older or newer SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlutterDefaults {
    #[serde(default = "default_compile_sdk", rename = "compile-sdk")]
    pub compile_sdk: u32,
    #[serde(default = "default_target_sdk", rename = "target-sdk")]
    pub target_sdk: u32,
    #[serde(default = "default_min_sdk", rename = "min-sdk")]
    pub min_sdk: u32,
    #[serde(default = "default_ndk_version", rename = "ndk-version")]
    pub ndk_version: String,
}

impl Default for FlutterDefaults {
    fn default() -> Self {
        Self {
            compile_sdk: default_compile_sdk(),
            target_sdk: default_target_sdk(),
            min_sdk: default_min_sdk(),
            ndk_version: default_ndk_version(),
        }
    }
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_target_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_ndk_version() -> String {
    "26.3.11579264".to_string()
}

impl FlutterDefaults {
    /// Look up a `flutter.*` SDK constant by provider key.
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "flutter.compileSdkVersion" => Some(self.compile_sdk.to_string()),
            "flutter.targetSdkVersion" => Some(self.target_sdk.to_string()),
            "flutter.minSdkVersion" => Some(self.min_sdk.to_string()),
            "flutter.ndkVersion" => Some(self.ndk_version.clone()),
            _ => None,
        }
    }
}

impl GlobalConfig {
    /// Load the global configuration from `~/.droidcfg/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from an explicit path, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("No global config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| DroidcfgError::Config {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            DroidcfgError::Config {
                message: format!("Failed to parse global config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the droidcfg data directory.
///
/// `DROIDCFG_HOME` wins; otherwise `~/.droidcfg/`.
pub fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var("DROIDCFG_HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".droidcfg")
}
