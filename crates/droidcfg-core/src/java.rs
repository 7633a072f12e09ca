use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use droidcfg_util::errors::DroidcfgError;

/// Source/target language level of compiled sources.
///
/// Accepts Gradle spellings on parse (`"1.8"`, `"8"`, `"VERSION_1_8"`,
/// `"JavaVersion.VERSION_17"`, `11`) and always serializes the canonical
/// form (`"1.8"`, `"11"`, `"17"`, `"21"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLevel", into = "String")]
pub enum JavaVersion {
    V1_8,
    V11,
    V17,
    V21,
}

impl JavaVersion {
    /// Canonical textual form, as used by `jvmTarget`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_8 => "1.8",
            Self::V11 => "11",
            Self::V17 => "17",
            Self::V21 => "21",
        }
    }

    /// The `JavaVersion` enum constant name used by the Gradle DSL.
    pub fn gradle_constant(&self) -> &'static str {
        match self {
            Self::V1_8 => "VERSION_1_8",
            Self::V11 => "VERSION_11",
            Self::V17 => "VERSION_17",
            Self::V21 => "VERSION_21",
        }
    }

    /// Returns `true` for levels that predate Java 11.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::V1_8)
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JavaVersion {
    type Err = DroidcfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let bare = bare.strip_prefix("VERSION_").unwrap_or(bare);
        match bare.replace('_', ".").as_str() {
            "1.8" | "8" => Ok(Self::V1_8),
            "11" => Ok(Self::V11),
            "17" => Ok(Self::V17),
            "21" => Ok(Self::V21),
            _ => Err(DroidcfgError::Descriptor {
                message: format!(
                    "Unsupported language level '{trimmed}' (expected one of 1.8, 11, 17, 21)"
                ),
            }),
        }
    }
}

impl From<JavaVersion> for String {
    fn from(v: JavaVersion) -> Self {
        v.as_str().to_string()
    }
}

/// Wire shape accepted for a language level: TOML strings, integers, or `1.8` as a float.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Text(String),
    Int(i64),
    Float(f64),
}

impl TryFrom<RawLevel> for JavaVersion {
    type Error = DroidcfgError;

    fn try_from(raw: RawLevel) -> Result<Self, Self::Error> {
        match raw {
            RawLevel::Text(s) => s.parse(),
            RawLevel::Int(i) => i.to_string().parse(),
            RawLevel::Float(f) => f.to_string().parse(),
        }
    }
}
