use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::dependency::DependencyRef;
use crate::descriptor::{CompileOptions, Descriptor, FlutterSection, KotlinOptions};
use crate::inherit::Inherited;
use crate::plugin::PluginRef;
use crate::provider::VersionProvider;
use crate::signing::{BuildType, SigningConfig};
use crate::validate::{ValidationError, ValidationFailure};

/// Concrete `[target]` values after inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    #[serde(rename = "application-id")]
    pub application_id: String,
    pub namespace: String,
    #[serde(rename = "min-sdk")]
    pub min_sdk: u32,
    #[serde(rename = "target-sdk")]
    pub target_sdk: u32,
    #[serde(rename = "compile-sdk")]
    pub compile_sdk: u32,
    #[serde(rename = "ndk-version", skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    #[serde(rename = "version-code")]
    pub version_code: u32,
    #[serde(rename = "version-name")]
    pub version_name: String,
}

/// A descriptor whose inherited fields all have concrete values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDescriptor {
    pub target: ResolvedTarget,
    pub descriptor: Descriptor,
    /// Field name to provider key, for every inherited field.
    pub inherited: BTreeMap<&'static str, String>,
}

/// Serializable view of a [`ResolvedDescriptor`]; same shape as the
/// descriptor with `[target]` replaced by concrete values.
#[derive(Debug, Serialize)]
pub struct ResolvedView<'a> {
    pub target: &'a ResolvedTarget,
    #[serde(rename = "compile-options")]
    pub compile_options: &'a CompileOptions,
    #[serde(rename = "kotlin-options", skip_serializing_if = "Option::is_none")]
    pub kotlin_options: Option<&'a KotlinOptions>,
    #[serde(rename = "signing-configs", skip_serializing_if = "BTreeMap::is_empty")]
    pub signing_configs: &'a BTreeMap<String, SigningConfig>,
    #[serde(rename = "build-types", skip_serializing_if = "BTreeMap::is_empty")]
    pub build_types: &'a BTreeMap<String, BuildType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flutter: Option<&'a FlutterSection>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub plugins: &'a [PluginRef],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub dependencies: &'a [DependencyRef],
}

impl ResolvedDescriptor {
    pub fn view(&self) -> ResolvedView<'_> {
        ResolvedView {
            target: &self.target,
            compile_options: &self.descriptor.compile_options,
            kotlin_options: self.descriptor.kotlin_options.as_ref(),
            signing_configs: &self.descriptor.signing_configs,
            build_types: &self.descriptor.build_types,
            flutter: self.descriptor.flutter.as_ref(),
            plugins: &self.descriptor.plugins,
            dependencies: &self.descriptor.dependencies,
        }
    }
}

/// Resolve every inherited field of `descriptor` against `provider`.
///
/// A key the provider does not define is a missing-field error; a value that
/// does not parse as the field's type is a constraint violation. Every field
/// is attempted before failing, so the failure lists all problems at once.
pub fn resolve(
    descriptor: &Descriptor,
    provider: &dyn VersionProvider,
) -> Result<ResolvedDescriptor, ValidationFailure> {
    let t = &descriptor.target;
    let mut errors = Vec::new();
    let mut inherited = BTreeMap::new();
    let mut field = |name: &'static str, value: &Inherited<u32>, errors: &mut Vec<_>| {
        if let Some(key) = value.inherit_key() {
            inherited.insert(name, key.to_string());
        }
        resolve_field(name, value, provider, errors)
    };

    let min_sdk = field("min-sdk", &t.min_sdk, &mut errors);
    let target_sdk = field("target-sdk", &t.target_sdk, &mut errors);
    let compile_sdk = field("compile-sdk", &t.compile_sdk, &mut errors);
    let version_code = field("version-code", &t.version_code, &mut errors);

    for (name, value) in [
        ("version-name", Some(&t.version_name)),
        ("ndk-version", t.ndk_version.as_ref()),
    ] {
        if let Some(key) = value.and_then(|v| v.inherit_key()) {
            inherited.insert(name, key.to_string());
        }
    }
    let version_name = resolve_field("version-name", &t.version_name, provider, &mut errors);
    let ndk_version = match &t.ndk_version {
        Some(v) => resolve_field("ndk-version", v, provider, &mut errors).map(Some),
        None => Some(None),
    };

    match (
        min_sdk,
        target_sdk,
        compile_sdk,
        version_code,
        version_name,
        ndk_version,
    ) {
        (
            Some(min_sdk),
            Some(target_sdk),
            Some(compile_sdk),
            Some(version_code),
            Some(version_name),
            Some(ndk_version),
        ) if errors.is_empty() => {
            tracing::debug!(
                "Resolved {} against {}: minSdk={min_sdk} targetSdk={target_sdk} versionCode={version_code}",
                t.application_id,
                provider.name()
            );
            Ok(ResolvedDescriptor {
                target: ResolvedTarget {
                    application_id: t.application_id.clone(),
                    namespace: descriptor.namespace().to_string(),
                    min_sdk,
                    target_sdk,
                    compile_sdk,
                    ndk_version,
                    version_code,
                    version_name,
                },
                descriptor: descriptor.clone(),
                inherited,
            })
        }
        _ => Err(ValidationFailure::new(
            &t.application_id,
            errors,
            Vec::new(),
        )),
    }
}

fn resolve_field<T>(
    field: &'static str,
    value: &Inherited<T>,
    provider: &dyn VersionProvider,
    errors: &mut Vec<ValidationError>,
) -> Option<T>
where
    T: FromStr + Clone,
    T::Err: Display,
{
    match value {
        Inherited::Value(v) => Some(v.clone()),
        Inherited::Inherit { inherit } => match provider.lookup(inherit) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Some(v),
                Err(e) => {
                    errors.push(ValidationError::ConstraintViolation {
                        field: field.to_string(),
                        value: raw.clone(),
                        constraint: format!("`{inherit}` must be a valid {field} ({e})"),
                    });
                    None
                }
            },
            None => {
                errors.push(ValidationError::MissingField {
                    field: field.to_string(),
                    detail: format!("`{inherit}` is not defined by {}", provider.name()),
                });
                None
            }
        },
    }
}
