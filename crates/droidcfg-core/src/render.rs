//! Rendering a descriptor to the Gradle Kotlin DSL (`build.gradle.kts`).
//!
//! The output follows the layout of a Flutter app module build script:
//! `plugins`, `android`, `flutter`, then `dependencies`. Inherited fields
//! render as the provider expression (`flutter.versionCode`) and
//! `${env:VAR}` secrets as `System.getenv("VAR")`, so the rendered script
//! never contains resolved secrets.

use std::fmt::Write;

use crate::dependency::DependencyRef;
use crate::descriptor::Descriptor;
use crate::inherit::Inherited;
use crate::properties::env_reference;
use crate::signing::{BuildType, SigningConfig};

const INDENT: &str = "    ";

/// Render `descriptor` as a `build.gradle.kts` script.
pub fn render_gradle_kts(descriptor: &Descriptor) -> String {
    let mut out = String::new();
    render_plugins(descriptor, &mut out);
    out.push('\n');
    render_android(descriptor, &mut out);
    if let Some(flutter) = &descriptor.flutter {
        out.push('\n');
        let _ = writeln!(out, "flutter {{");
        let _ = writeln!(out, "{INDENT}source = {}", kts_string(&flutter.source));
        let _ = writeln!(out, "}}");
    }
    if !descriptor.dependencies.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "dependencies {{");
        for dep in &descriptor.dependencies {
            let _ = writeln!(
                out,
                "{INDENT}{}({})",
                dep.configuration.as_str(),
                dependency_notation(dep)
            );
        }
        let _ = writeln!(out, "}}");
    }
    out
}

fn render_plugins(d: &Descriptor, out: &mut String) {
    let _ = writeln!(out, "plugins {{");
    for plugin in &d.plugins {
        match &plugin.version {
            Some(v) => {
                let _ = writeln!(
                    out,
                    "{INDENT}id({}) version {}",
                    kts_string(&plugin.id),
                    kts_string(v)
                );
            }
            None => {
                let _ = writeln!(out, "{INDENT}id({})", kts_string(&plugin.id));
            }
        }
    }
    let _ = writeln!(out, "}}");
}

fn render_android(d: &Descriptor, out: &mut String) {
    let t = &d.target;
    let _ = writeln!(out, "android {{");
    let _ = writeln!(out, "{INDENT}namespace = {}", kts_string(d.namespace()));
    let _ = writeln!(out, "{INDENT}compileSdk = {}", int_expr(&t.compile_sdk));
    if let Some(ndk) = &t.ndk_version {
        let _ = writeln!(out, "{INDENT}ndkVersion = {}", string_expr(ndk));
    }

    let co = &d.compile_options;
    if co.source_compatibility.is_some()
        || co.target_compatibility.is_some()
        || co.core_library_desugaring
    {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}compileOptions {{");
        if let Some(v) = co.source_compatibility {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}sourceCompatibility = JavaVersion.{}",
                v.gradle_constant()
            );
        }
        if let Some(v) = co.target_compatibility {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}targetCompatibility = JavaVersion.{}",
                v.gradle_constant()
            );
        }
        if co.core_library_desugaring {
            let _ = writeln!(out, "{INDENT}{INDENT}isCoreLibraryDesugaringEnabled = true");
        }
        let _ = writeln!(out, "{INDENT}}}");
    }

    if let Some(jvm_target) = d.kotlin_options.as_ref().and_then(|k| k.jvm_target) {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}kotlinOptions {{");
        let _ = writeln!(out, "{INDENT}{INDENT}jvmTarget = {}", kts_string(jvm_target.as_str()));
        let _ = writeln!(out, "{INDENT}}}");
    }

    out.push('\n');
    let _ = writeln!(out, "{INDENT}defaultConfig {{");
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}applicationId = {}",
        kts_string(&t.application_id)
    );
    let _ = writeln!(out, "{INDENT}{INDENT}minSdk = {}", int_expr(&t.min_sdk));
    let _ = writeln!(out, "{INDENT}{INDENT}targetSdk = {}", int_expr(&t.target_sdk));
    let _ = writeln!(out, "{INDENT}{INDENT}versionCode = {}", int_expr(&t.version_code));
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}versionName = {}",
        string_expr(&t.version_name)
    );
    let _ = writeln!(out, "{INDENT}}}");

    if !d.signing_configs.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}signingConfigs {{");
        for (name, config) in &d.signing_configs {
            render_signing_config(name, config, out);
        }
        let _ = writeln!(out, "{INDENT}}}");
    }

    if !d.build_types.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}buildTypes {{");
        for (name, build_type) in &d.build_types {
            render_build_type(name, build_type, out);
        }
        let _ = writeln!(out, "{INDENT}}}");
    }
    let _ = writeln!(out, "}}");
}

fn render_signing_config(name: &str, config: &SigningConfig, out: &mut String) {
    let pad = INDENT.repeat(3);
    let _ = writeln!(out, "{INDENT}{INDENT}create({}) {{", kts_string(name));
    if let Some(file) = &config.store_file {
        let _ = writeln!(out, "{pad}storeFile = file({})", kts_string(file));
    }
    if let Some(pw) = &config.store_password {
        let _ = writeln!(out, "{pad}storePassword = {}", kts_string(pw));
    }
    if let Some(alias) = &config.key_alias {
        let _ = writeln!(out, "{pad}keyAlias = {}", kts_string(alias));
    }
    if let Some(pw) = &config.key_password {
        let _ = writeln!(out, "{pad}keyPassword = {}", kts_string(pw));
    }
    let _ = writeln!(out, "{INDENT}{INDENT}}}");
}

fn render_build_type(name: &str, build_type: &BuildType, out: &mut String) {
    let pad = INDENT.repeat(3);
    match name {
        "debug" | "release" => {
            let _ = writeln!(out, "{INDENT}{INDENT}{name} {{");
        }
        _ => {
            let _ = writeln!(out, "{INDENT}{INDENT}create({}) {{", kts_string(name));
        }
    }
    if let Some(profile) = &build_type.signing_config {
        let _ = writeln!(
            out,
            "{pad}signingConfig = signingConfigs.getByName({})",
            kts_string(profile)
        );
    }
    if build_type.minify {
        let _ = writeln!(out, "{pad}isMinifyEnabled = true");
    }
    if build_type.shrink_resources {
        let _ = writeln!(out, "{pad}isShrinkResources = true");
    }
    let _ = writeln!(out, "{INDENT}{INDENT}}}");
}

/// `kotlin("stdlib-jdk7")` for plugin-managed Kotlin artifacts, otherwise
/// the quoted coordinate with its version.
fn dependency_notation(dep: &DependencyRef) -> String {
    if dep.is_kotlin_managed() {
        if let Some(coord) = dep.coordinates() {
            let module = coord
                .artifact_id
                .strip_prefix("kotlin-")
                .unwrap_or(&coord.artifact_id);
            return format!("kotlin({})", kts_string(module));
        }
    }
    match (dep.coordinates(), dep.effective_version()) {
        (Some(mut coord), Some(version)) => {
            coord.version = Some(version);
            kts_string(&coord.to_string())
        }
        _ => kts_string(&dep.coordinate),
    }
}

fn int_expr(value: &Inherited<u32>) -> String {
    match value {
        Inherited::Value(v) => v.to_string(),
        Inherited::Inherit { inherit } => inherit.clone(),
    }
}

fn string_expr(value: &Inherited<String>) -> String {
    match value {
        Inherited::Value(v) => kts_string(v),
        Inherited::Inherit { inherit } => inherit.clone(),
    }
}

/// A Kotlin string literal, or `System.getenv(..)` for a lone `${env:VAR}`.
pub fn kts_string(value: &str) -> String {
    if let Some(var) = env_reference(value) {
        return format!("System.getenv(\"{var}\")");
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
