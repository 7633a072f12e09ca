//! Descriptor validation.
//!
//! Validation is all-or-nothing: every check runs, and a single error fails
//! the whole descriptor with all errors attached. Advisories never fail a
//! descriptor; they are carried alongside either outcome.

use miette::Diagnostic;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::dependency::Configuration;
use crate::descriptor::Descriptor;
use crate::floors::FloorCatalog;
use crate::plugin::check_activations;
use crate::provider::VersionProvider;
use crate::resolve::{resolve, ResolvedDescriptor};
use crate::signing::{is_builtin_profile, DEBUG_PROFILE};

/// Highest `versionCode` Google Play accepts.
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Broad class of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    MissingField,
    ConstraintViolation,
    UnresolvedReference,
    Consistency,
}

/// A single fatal problem with a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("missing required field `{field}`: {detail}")]
    #[diagnostic(code(droidcfg::missing_field))]
    MissingField { field: String, detail: String },

    #[error("`{field}` = {value} violates: {constraint}")]
    #[diagnostic(code(droidcfg::constraint))]
    ConstraintViolation {
        field: String,
        value: String,
        constraint: String,
    },

    #[error("`min-sdk` = {min_sdk} is below {required}, the floor required by dependency `{dependency}`")]
    #[diagnostic(code(droidcfg::sdk_floor))]
    SdkFloor {
        min_sdk: u32,
        required: u32,
        dependency: String,
        #[help]
        reason: Option<String>,
    },

    #[error("unresolved {kind} `{name}`: {detail}")]
    #[diagnostic(code(droidcfg::unresolved))]
    UnresolvedReference {
        kind: String,
        name: String,
        detail: String,
    },

    #[error("inconsistent `{field}`: {detail}")]
    #[diagnostic(code(droidcfg::inconsistent))]
    Inconsistent { field: String, detail: String },

    #[error("plugin `{plugin}` requires `{capability}`, which `{provider}` only provides later")]
    #[diagnostic(
        code(droidcfg::plugin_order),
        help("activate plugins in this order: {suggested}")
    )]
    PluginOrder {
        plugin: String,
        capability: String,
        provider: String,
        suggested: String,
    },
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. } => ErrorCategory::MissingField,
            Self::ConstraintViolation { .. } | Self::SdkFloor { .. } => {
                ErrorCategory::ConstraintViolation
            }
            Self::UnresolvedReference { .. } => ErrorCategory::UnresolvedReference,
            Self::Inconsistent { .. } | Self::PluginOrder { .. } => ErrorCategory::Consistency,
        }
    }
}

/// Kind of a non-fatal [`Advisory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryCode {
    /// Release builds are signed with the debug profile.
    ReleaseDebugSigning,
    /// A desugaring library is declared while desugaring is off.
    DesugaringUnused,
    /// `target-sdk` exceeds `compile-sdk`.
    TargetAboveCompile,
    /// Sources compile at language level 1.8.
    LegacyLanguageLevel,
}

impl AdvisoryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReleaseDebugSigning => "release-debug-signing",
            Self::DesugaringUnused => "desugaring-unused",
            Self::TargetAboveCompile => "target-above-compile",
            Self::LegacyLanguageLevel => "legacy-language-level",
        }
    }
}

impl fmt::Display for AdvisoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal finding the descriptor's owner should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub code: AdvisoryCode,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// A descriptor that passed validation.
#[derive(Debug, Clone)]
pub struct Validated {
    pub descriptor: ResolvedDescriptor,
    pub advisories: Vec<Advisory>,
}

/// Every error found in a descriptor.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("descriptor for `{subject}` is invalid ({} error(s))", .errors.len())]
#[diagnostic(code(droidcfg::invalid))]
pub struct ValidationFailure {
    pub subject: String,
    #[related]
    pub errors: Vec<ValidationError>,
    /// Advisories found before the descriptor failed.
    pub advisories: Vec<Advisory>,
}

impl ValidationFailure {
    pub fn new(subject: &str, errors: Vec<ValidationError>, advisories: Vec<Advisory>) -> Self {
        Self {
            subject: subject.to_string(),
            errors,
            advisories,
        }
    }

    pub fn has(&self, category: ErrorCategory) -> bool {
        self.errors.iter().any(|e| e.category() == category)
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<ValidationError>,
    advisories: Vec<Advisory>,
}

impl Findings {
    fn advise(&mut self, code: AdvisoryCode, message: impl Into<String>) {
        self.advisories.push(Advisory {
            code,
            message: message.into(),
        });
    }
}

/// Resolve inherited fields, then validate.
///
/// If resolution fails, the structural checks and every level check whose
/// fields are literal still run, so the failure reports every problem in
/// one pass.
pub fn evaluate(
    descriptor: &Descriptor,
    provider: &dyn VersionProvider,
    floors: &FloorCatalog,
) -> Result<Validated, ValidationFailure> {
    match resolve(descriptor, provider) {
        Ok(resolved) => validate(&resolved, floors),
        Err(mut failure) => {
            let mut findings = Findings::default();
            check_structure(descriptor, &mut findings);
            check_levels(&Levels::literal(descriptor), descriptor, floors, &mut findings);
            failure.errors.extend(findings.errors);
            failure.advisories.extend(findings.advisories);
            Err(failure)
        }
    }
}

/// Validate a resolved descriptor against the known SDK floors.
pub fn validate(
    resolved: &ResolvedDescriptor,
    floors: &FloorCatalog,
) -> Result<Validated, ValidationFailure> {
    let mut findings = Findings::default();
    check_structure(&resolved.descriptor, &mut findings);
    check_levels(
        &Levels::resolved(resolved),
        &resolved.descriptor,
        floors,
        &mut findings,
    );

    tracing::debug!(
        "Validated {}: {} error(s), {} advisory(ies)",
        resolved.target.application_id,
        findings.errors.len(),
        findings.advisories.len()
    );

    if findings.errors.is_empty() {
        Ok(Validated {
            descriptor: resolved.clone(),
            advisories: findings.advisories,
        })
    } else {
        Err(ValidationFailure::new(
            &resolved.target.application_id,
            findings.errors,
            findings.advisories,
        ))
    }
}

/// Checks that need no inherited values.
fn check_structure(d: &Descriptor, findings: &mut Findings) {
    check_identifier("application-id", &d.target.application_id, findings);
    if let Some(ns) = &d.target.namespace {
        check_identifier("namespace", ns, findings);
    }
    check_language_levels(d, findings);
    check_dependencies(d, findings);
    check_desugaring(d, findings);
    check_signing(d, findings);
    findings
        .errors
        .extend(check_activations(&d.plugins, d.flutter.is_some()));
}

/// SDK levels and version code, where known.
struct Levels {
    min_sdk: Option<u32>,
    target_sdk: Option<u32>,
    compile_sdk: Option<u32>,
    version_code: Option<u32>,
}

impl Levels {
    fn resolved(r: &ResolvedDescriptor) -> Self {
        Self {
            min_sdk: Some(r.target.min_sdk),
            target_sdk: Some(r.target.target_sdk),
            compile_sdk: Some(r.target.compile_sdk),
            version_code: Some(r.target.version_code),
        }
    }

    /// Only the fields declared literally in the descriptor.
    fn literal(d: &Descriptor) -> Self {
        Self {
            min_sdk: d.target.min_sdk.value().copied(),
            target_sdk: d.target.target_sdk.value().copied(),
            compile_sdk: d.target.compile_sdk.value().copied(),
            version_code: d.target.version_code.value().copied(),
        }
    }
}

/// SDK level and version checks. A check is skipped when one of its
/// inputs is unknown.
fn check_levels(
    levels: &Levels,
    d: &Descriptor,
    floors: &FloorCatalog,
    findings: &mut Findings,
) {
    if let (Some(min), Some(target)) = (levels.min_sdk, levels.target_sdk) {
        if min > target {
            findings.errors.push(ValidationError::ConstraintViolation {
                field: "min-sdk".into(),
                value: min.to_string(),
                constraint: format!("must not exceed `target-sdk` = {target}"),
            });
        }
    }
    if let (Some(target), Some(compile)) = (levels.target_sdk, levels.compile_sdk) {
        if target > compile {
            findings.advise(
                AdvisoryCode::TargetAboveCompile,
                format!("`target-sdk` = {target} is above `compile-sdk` = {compile}"),
            );
        }
    }
    if let Some(code) = levels.version_code {
        if code == 0 || code > MAX_VERSION_CODE {
            findings.errors.push(ValidationError::ConstraintViolation {
                field: "version-code".into(),
                value: code.to_string(),
                constraint: format!("must be between 1 and {MAX_VERSION_CODE}"),
            });
        }
    }

    let Some(min_sdk) = levels.min_sdk else {
        return;
    };
    let mut catalog = floors.clone();
    catalog.extend_from(&d.sdk_floors, crate::floors::FloorOrigin::Descriptor);
    for req in catalog.requirements(&d.dependencies) {
        if req.min_sdk > min_sdk {
            findings.errors.push(ValidationError::SdkFloor {
                min_sdk,
                required: req.min_sdk,
                dependency: req.imposed_by,
                reason: req.reason,
            });
        }
    }
}

/// Reverse-domain identifier: two or more dot-separated segments, each a
/// letter followed by letters, digits or underscores.
pub fn is_valid_identifier(id: &str) -> bool {
    let segments: Vec<&str> = id.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|seg| {
            let mut chars = seg.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn check_identifier(field: &str, value: &str, findings: &mut Findings) {
    if !is_valid_identifier(value) {
        findings.errors.push(ValidationError::ConstraintViolation {
            field: field.into(),
            value: format!("\"{value}\""),
            constraint: "must be a reverse-domain identifier such as `com.example.app`".into(),
        });
    }
}

fn check_language_levels(d: &Descriptor, findings: &mut Findings) {
    let levels = d.language_levels();
    let distinct: BTreeSet<_> = levels.iter().map(|(_, v)| *v).collect();
    if distinct.len() > 1 {
        let detail = levels
            .iter()
            .map(|(section, v)| format!("{section} = {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        findings.errors.push(ValidationError::Inconsistent {
            field: "language level".into(),
            detail: format!("every compiled-source section must agree ({detail})"),
        });
    } else if let Some(level) = distinct.into_iter().next() {
        if level.is_legacy() {
            findings.advise(
                AdvisoryCode::LegacyLanguageLevel,
                format!("sources compile at language level {level}; 11 or newer is recommended"),
            );
        }
    }
}

fn check_dependencies(d: &Descriptor, findings: &mut Findings) {
    let mut seen = BTreeSet::new();
    for (i, dep) in d.dependencies.iter().enumerate() {
        let Some(coord) = dep.coordinates() else {
            findings.errors.push(ValidationError::UnresolvedReference {
                kind: "dependency coordinate".into(),
                name: dep.coordinate.clone(),
                detail: format!("dependencies[{i}] is not of the form group:artifact[:version]"),
            });
            continue;
        };
        if let (Some(embedded), Some(explicit)) = (&coord.version, &dep.version) {
            if embedded != explicit {
                findings.errors.push(ValidationError::Inconsistent {
                    field: format!("dependencies[{i}].version"),
                    detail: format!(
                        "`{}` embeds version {embedded} but `version` is {explicit}",
                        dep.coordinate
                    ),
                });
            }
        }
        if !seen.insert((dep.configuration, coord.module())) {
            findings.errors.push(ValidationError::Inconsistent {
                field: format!("dependencies[{i}]"),
                detail: format!(
                    "`{}` is declared more than once in `{}`",
                    coord.module(),
                    dep.configuration.as_str()
                ),
            });
        }
    }
}

fn check_desugaring(d: &Descriptor, findings: &mut Findings) {
    let libs: Vec<_> = d
        .dependencies_in(Configuration::CoreLibraryDesugaring)
        .collect();
    if d.compile_options.core_library_desugaring {
        if libs.is_empty() {
            findings.errors.push(ValidationError::MissingField {
                field: "dependencies".into(),
                detail: "`core-library-desugaring` is enabled but no `coreLibraryDesugaring` dependency is declared".into(),
            });
        }
    } else if let Some(lib) = libs.first() {
        findings.advise(
            AdvisoryCode::DesugaringUnused,
            format!(
                "`{}` is declared but `core-library-desugaring` is disabled",
                lib.coordinate
            ),
        );
    }
    for lib in libs {
        if lib.effective_version().is_none() {
            findings.errors.push(ValidationError::MissingField {
                field: "version".into(),
                detail: format!(
                    "desugaring library `{}` must pin a version; the shim's API surface depends on it",
                    lib.coordinate
                ),
            });
        }
    }
}

fn check_signing(d: &Descriptor, findings: &mut Findings) {
    for (variant, build_type) in &d.build_types {
        let Some(profile) = &build_type.signing_config else {
            continue;
        };
        if !is_builtin_profile(profile) && !d.signing_configs.contains_key(profile) {
            findings.errors.push(ValidationError::UnresolvedReference {
                kind: "signing config".into(),
                name: profile.clone(),
                detail: format!(
                    "referenced by build type `{variant}` but not declared in `[signing-configs]`"
                ),
            });
        }
    }
    for (name, config) in &d.signing_configs {
        if config.store_file.is_some() && config.key_alias.is_none() {
            findings.errors.push(ValidationError::MissingField {
                field: format!("signing-configs.{name}.key-alias"),
                detail: "a signing config with a `store-file` needs a `key-alias`".into(),
            });
        }
    }

    let release = d.signing_for("release");
    if release.is_some() && release == d.signing_for(DEBUG_PROFILE) {
        findings.advise(
            AdvisoryCode::ReleaseDebugSigning,
            format!(
                "release builds are signed with the `{}` profile; configure a release key before distributing",
                release.unwrap_or(DEBUG_PROFILE)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_reverse_domain() {
        assert!(is_valid_identifier("com.jaimevillalba.ravengate"));
        assert!(is_valid_identifier("io.app_2.x1"));
    }

    #[test]
    fn identifier_rejects_malformed() {
        assert!(!is_valid_identifier("ravengate"));
        assert!(!is_valid_identifier("com..app"));
        assert!(!is_valid_identifier("com.1app"));
        assert!(!is_valid_identifier("com.my-app"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn categories_cover_floor_and_order() {
        let floor = ValidationError::SdkFloor {
            min_sdk: 21,
            required: 23,
            dependency: "x:y".into(),
            reason: None,
        };
        assert_eq!(floor.category(), ErrorCategory::ConstraintViolation);
        let order = ValidationError::PluginOrder {
            plugin: "a".into(),
            capability: "b".into(),
            provider: "c".into(),
            suggested: "c, a".into(),
        };
        assert_eq!(order.category(), ErrorCategory::Consistency);
    }
}
