//! Embedded descriptor templates for `droidcfg init`.
//!
//! Templates are TOML descriptors compiled into the binary via `include_str!`.
//! Each template declares the `Droidcfg.toml` content and any extra files to
//! generate. Simple `{{variable}}` interpolation is performed at render time.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use droidcfg_util::errors::DroidcfgError;
use droidcfg_util::fs::write_if_absent;

/// Metadata about a template (name, description).
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateMeta {
    pub name: String,
    pub description: String,
}

/// Raw `Droidcfg.toml` content with `{{variable}}` placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestTemplate {
    pub content: String,
}

/// An extra file to create, with interpolated content.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

/// A complete descriptor template parsed from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorTemplate {
    pub template: TemplateMeta,
    pub manifest: ManifestTemplate,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Variables available for `{{variable}}` interpolation in template content.
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Create a context with the standard variables. The namespace starts
    /// out equal to the application id.
    pub fn new(project_name: &str, application_id: &str) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("project_name".to_string(), project_name.to_string());
        vars.insert("application_id".to_string(), application_id.to_string());
        vars.insert("namespace".to_string(), application_id.to_string());
        Self { vars }
    }

    /// Add or replace a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

/// Replace all `{{key}}` placeholders in `input` with values from `ctx`.
/// Unknown placeholders are left intact.
pub fn interpolate(input: &str, ctx: &TemplateContext) -> String {
    let mut result = input.to_string();
    for (key, value) in &ctx.vars {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

impl DescriptorTemplate {
    /// Parse a template from a TOML string.
    pub fn parse_toml(toml_str: &str) -> miette::Result<Self> {
        toml::from_str(toml_str).map_err(|e| {
            DroidcfgError::Generic {
                message: format!("Failed to parse descriptor template: {e}"),
            }
            .into()
        })
    }

    /// The interpolated `Droidcfg.toml` content.
    pub fn manifest(&self, ctx: &TemplateContext) -> String {
        interpolate(&self.manifest.content, ctx)
    }

    /// Write `Droidcfg.toml`, `.droidcfg.env` and the template's extra files
    /// into `root`. Existing files are never overwritten.
    ///
    /// Returns the paths that were written.
    pub fn render(&self, root: &Path, ctx: &TemplateContext) -> miette::Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut write = |path: PathBuf, content: &str| -> miette::Result<()> {
            if write_if_absent(&path, content).map_err(DroidcfgError::Io)? {
                written.push(path);
            }
            Ok(())
        };

        write(root.join(crate::DESCRIPTOR_FILE), &self.manifest(ctx))?;
        write(
            root.join(crate::ENV_FILE),
            "# Signing secrets (this file is gitignored)\n\
             # Values here are available via ${env:VAR} in Droidcfg.toml.\n",
        )?;
        for file in &self.files {
            write(root.join(&file.path), &interpolate(&file.content, ctx))?;
        }

        Ok(written)
    }
}

/// Registry of all built-in templates.
pub struct TemplateRegistry {
    templates: BTreeMap<String, DescriptorTemplate>,
}

impl TemplateRegistry {
    /// Build the registry from all embedded template TOML files.
    pub fn new() -> miette::Result<Self> {
        let raw_templates: Vec<(&str, &str)> = vec![
            ("flutter", include_str!("../templates/flutter.toml")),
            ("android", include_str!("../templates/android.toml")),
        ];

        let mut templates = BTreeMap::new();
        for (name, src) in raw_templates {
            let tmpl = DescriptorTemplate::parse_toml(src).map_err(|_| DroidcfgError::Generic {
                message: format!("Built-in template '{name}' is malformed"),
            })?;
            templates.insert(name.to_string(), tmpl);
        }

        Ok(Self { templates })
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Option<&DescriptorTemplate> {
        self.templates.get(name)
    }

    /// List all available template names with descriptions.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.templates
            .iter()
            .map(|(k, v)| (k.as_str(), v.template.description.as_str()))
            .collect()
    }

    /// Return all valid template names (for CLI validation).
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(|k| k.as_str()).collect()
    }
}
