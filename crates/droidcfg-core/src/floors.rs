//! Minimum platform versions imposed by dependencies.
//!
//! A floor says "this module needs at least API level N". Floors come from a
//! built-in table of well-known libraries, from `[floors]` in the global
//! config, and from `[sdk-floors]` in the descriptor. The latter describe
//! transitive requirements (Flutter plugins pulling in Firebase, say) that
//! never show up as `[[dependencies]]` and therefore always apply.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dependency::DependencyRef;

/// A floor declaration as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorDecl {
    #[serde(rename = "min-sdk")]
    pub min_sdk: u32,
    /// Only versions at or above this one carry the floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Where a floor was declared. Later origins override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FloorOrigin {
    Builtin,
    GlobalConfig,
    Descriptor,
}

/// A floor bound to the `group:artifact` module it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkFloor {
    pub module: String,
    pub min_sdk: u32,
    pub since: Option<String>,
    pub reason: Option<String>,
    pub origin: FloorOrigin,
}

/// A floor that applies to the descriptor, with the dependency imposing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorRequirement {
    pub min_sdk: u32,
    pub imposed_by: String,
    pub reason: Option<String>,
}

const BUILTIN_FLOORS: &[(&str, u32, &str, &str)] = &[
    (
        "com.google.firebase:firebase-auth",
        23,
        "23.0.0",
        "Firebase Auth 23 requires minSdk 23",
    ),
    (
        "com.google.android.gms:play-services-auth",
        21,
        "21.0.0",
        "Google Play services dropped API levels below 21",
    ),
    (
        "androidx.core:core-ktx",
        21,
        "1.15.0",
        "AndroidX Core 1.15 requires minSdk 21",
    ),
    (
        "androidx.work:work-runtime",
        21,
        "2.10.0",
        "WorkManager 2.10 requires minSdk 21",
    ),
];

/// Merged lookup of every known floor, keyed by module.
#[derive(Debug, Clone, Default)]
pub struct FloorCatalog {
    floors: BTreeMap<String, SdkFloor>,
}

impl FloorCatalog {
    /// A catalog with only the built-in table.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (module, min_sdk, since, reason) in BUILTIN_FLOORS {
            catalog.insert(SdkFloor {
                module: module.to_string(),
                min_sdk: *min_sdk,
                since: Some(since.to_string()),
                reason: Some(reason.to_string()),
                origin: FloorOrigin::Builtin,
            });
        }
        catalog
    }

    /// Add floors from `decls`, overriding any earlier entry for the same module.
    pub fn extend_from(&mut self, decls: &BTreeMap<String, FloorDecl>, origin: FloorOrigin) {
        for (module, decl) in decls {
            self.insert(SdkFloor {
                module: module.clone(),
                min_sdk: decl.min_sdk,
                since: decl.since.clone(),
                reason: decl.reason.clone(),
                origin,
            });
        }
    }

    fn insert(&mut self, floor: SdkFloor) {
        if let Some(previous) = self.floors.get(&floor.module) {
            if previous.origin > floor.origin {
                return;
            }
            tracing::debug!(
                "Floor for {} overridden: {} -> {}",
                floor.module,
                previous.min_sdk,
                floor.min_sdk
            );
        }
        self.floors.insert(floor.module.clone(), floor);
    }

    pub fn get(&self, module: &str) -> Option<&SdkFloor> {
        self.floors.get(module)
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Every floor that applies to the given dependency set.
    ///
    /// Descriptor-declared floors always apply. Other floors apply when a
    /// dependency names the module and, if `since` is set, its version is at
    /// least `since`. Versions that do not parse apply the floor.
    pub fn requirements(&self, deps: &[DependencyRef]) -> Vec<FloorRequirement> {
        let mut out: Vec<FloorRequirement> = self
            .floors
            .values()
            .filter(|f| f.origin == FloorOrigin::Descriptor)
            .map(|f| FloorRequirement {
                min_sdk: f.min_sdk,
                imposed_by: f.module.clone(),
                reason: f.reason.clone(),
            })
            .collect();

        for dep in deps {
            let Some(coord) = dep.coordinates() else {
                continue;
            };
            let module = coord.module();
            let Some(floor) = self.floors.get(&module) else {
                continue;
            };
            if floor.origin == FloorOrigin::Descriptor {
                continue;
            }
            if applies_to_version(floor.since.as_deref(), dep.effective_version().as_deref()) {
                out.push(FloorRequirement {
                    min_sdk: floor.min_sdk,
                    imposed_by: match dep.effective_version() {
                        Some(v) => format!("{module}:{v}"),
                        None => module.clone(),
                    },
                    reason: floor.reason.clone(),
                });
            }
        }
        out
    }

    /// The highest floor required by the dependency set, if any.
    pub fn required_floor(&self, deps: &[DependencyRef]) -> Option<FloorRequirement> {
        self.requirements(deps)
            .into_iter()
            .max_by_key(|r| r.min_sdk)
    }
}

fn applies_to_version(since: Option<&str>, version: Option<&str>) -> bool {
    let Some(since) = since else {
        return true;
    };
    match (lenient_version(since), version.and_then(lenient_version)) {
        (Some(since), Some(version)) => version >= since,
        _ => true,
    }
}

/// Parse a Maven-style version as semver, padding missing minor/patch parts.
pub fn lenient_version(s: &str) -> Option<semver::Version> {
    let s = s.trim();
    if let Ok(v) = semver::Version::parse(s) {
        return Some(v);
    }
    let (core, rest) = match s.find(['-', '+']) {
        Some(idx) => s.split_at(idx),
        None => (s, ""),
    };
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    semver::Version::parse(&format!("{}{rest}", parts.join("."))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_pads_short_versions() {
        assert_eq!(lenient_version("23.2").unwrap(), semver::Version::new(23, 2, 0));
        assert_eq!(lenient_version("2").unwrap(), semver::Version::new(2, 0, 0));
    }

    #[test]
    fn lenient_keeps_prerelease() {
        let v = lenient_version("1.15-alpha01").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 15);
        assert!(!v.pre.is_empty());
    }

    #[test]
    fn lenient_rejects_garbage() {
        assert!(lenient_version("latest.release").is_none());
    }

    #[test]
    fn unparseable_version_applies_floor() {
        assert!(applies_to_version(Some("23.0.0"), Some("+")));
        assert!(applies_to_version(Some("23.0.0"), None));
    }

    #[test]
    fn older_version_escapes_floor() {
        assert!(!applies_to_version(Some("23.0.0"), Some("22.3.1")));
        assert!(applies_to_version(Some("23.0.0"), Some("23.2.1")));
    }
}
