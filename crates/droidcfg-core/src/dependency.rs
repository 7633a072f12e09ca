use serde::{Deserialize, Serialize};

/// Group of the Kotlin artifacts whose versions are managed by the Kotlin plugin.
pub const KOTLIN_GROUP: &str = "org.jetbrains.kotlin";

/// A dependency declaration from `[[dependencies]]`.
///
/// The version is either embedded in `coordinate` (`group:artifact:version`),
/// given separately via `version`, or absent when the artifact is managed by
/// a plugin (the Kotlin stdlib, for instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRef {
    #[serde(default)]
    pub configuration: Configuration,
    pub coordinate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The Gradle configuration a dependency is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Configuration {
    #[default]
    Implementation,
    Api,
    CompileOnly,
    RuntimeOnly,
    CoreLibraryDesugaring,
    TestImplementation,
}

impl Configuration {
    /// The configuration name as written in a Gradle `dependencies { }` block.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implementation => "implementation",
            Self::Api => "api",
            Self::CompileOnly => "compileOnly",
            Self::RuntimeOnly => "runtimeOnly",
            Self::CoreLibraryDesugaring => "coreLibraryDesugaring",
            Self::TestImplementation => "testImplementation",
        }
    }

    /// Parse a Gradle configuration name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "implementation" => Some(Self::Implementation),
            "api" => Some(Self::Api),
            "compileOnly" => Some(Self::CompileOnly),
            "runtimeOnly" => Some(Self::RuntimeOnly),
            "coreLibraryDesugaring" => Some(Self::CoreLibraryDesugaring),
            "testImplementation" => Some(Self::TestImplementation),
            _ => None,
        }
    }
}

/// Maven coordinates parsed from a `group:artifact[:version]` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl Coordinate {
    /// Parse `"group:artifact"` or `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.is_empty() || p.contains(char::is_whitespace)) {
            return None;
        }
        match parts.as_slice() {
            [group, artifact] => Some(Self {
                group_id: group.to_string(),
                artifact_id: artifact.to_string(),
                version: None,
            }),
            [group, artifact, version] => Some(Self {
                group_id: group.to_string(),
                artifact_id: artifact.to_string(),
                version: Some(version.to_string()),
            }),
            _ => None,
        }
    }

    /// The version-less `group:artifact` key.
    pub fn module(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{v}", self.group_id, self.artifact_id),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}

impl DependencyRef {
    /// Build a dependency from a `group:artifact[:version]` spec.
    pub fn new(configuration: Configuration, coordinate: impl Into<String>) -> Self {
        Self {
            configuration,
            coordinate: coordinate.into(),
            version: None,
        }
    }

    /// Parsed coordinates, or `None` if the coordinate string is malformed.
    pub fn coordinates(&self) -> Option<Coordinate> {
        Coordinate::parse(&self.coordinate)
    }

    /// The pinned version, from either the `version` key or the coordinate.
    pub fn effective_version(&self) -> Option<String> {
        self.version
            .clone()
            .or_else(|| self.coordinates().and_then(|c| c.version))
    }

    /// Returns `true` for version-less Kotlin artifacts whose version the
    /// Kotlin plugin supplies (rendered as `kotlin("stdlib-jdk7")`).
    pub fn is_kotlin_managed(&self) -> bool {
        self.effective_version().is_none()
            && self.coordinates().is_some_and(|c| {
                c.group_id == KOTLIN_GROUP && c.artifact_id.starts_with("kotlin-")
            })
    }
}
