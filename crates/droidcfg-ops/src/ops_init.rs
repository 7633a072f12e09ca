//! Operation: scaffold a descriptor in an existing directory.

use std::path::{Path, PathBuf};

use droidcfg_core::template::{TemplateContext, TemplateRegistry};
use droidcfg_core::validate::is_valid_identifier;
use droidcfg_core::DESCRIPTOR_FILE;
use droidcfg_util::errors::DroidcfgError;

/// Options for `droidcfg init`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub template: String,
    /// Defaults to the directory name.
    pub name: Option<String>,
    /// Defaults to `com.example.<name>`.
    pub application_id: Option<String>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            template: "flutter".to_string(),
            name: None,
            application_id: None,
        }
    }
}

/// Write `Droidcfg.toml` and its companion files into `dir`.
///
/// Fails if a descriptor already exists. Other existing files are kept.
/// Returns the paths that were created.
pub fn init(dir: &Path, opts: &InitOptions) -> miette::Result<Vec<PathBuf>> {
    if dir.join(DESCRIPTOR_FILE).exists() {
        return Err(DroidcfgError::Generic {
            message: format!("{DESCRIPTOR_FILE} already exists in {}", dir.display()),
        }
        .into());
    }

    let registry = TemplateRegistry::new()?;
    let template = registry
        .get(&opts.template)
        .ok_or_else(|| DroidcfgError::Generic {
            message: format!(
                "Unknown template '{}'. Available: {}",
                opts.template,
                registry.names().join(", ")
            ),
        })?;

    let name = opts.name.clone().unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app")
            .to_string()
    });
    let application_id = match &opts.application_id {
        Some(id) => id.clone(),
        None => format!("com.example.{}", package_segment(&name)),
    };
    if !is_valid_identifier(&application_id) {
        return Err(DroidcfgError::Generic {
            message: format!(
                "'{application_id}' is not a valid application id (expected something like com.example.app)"
            ),
        }
        .into());
    }

    let ctx = TemplateContext::new(&name, &application_id);
    let written = template.render(dir, &ctx)?;
    tracing::info!("Initialized {} from the '{}' template", name, opts.template);
    Ok(written)
}

/// Turn a project name into a single identifier segment.
fn package_segment(name: &str) -> String {
    let mut segment: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if !segment.starts_with(|c: char| c.is_ascii_alphabetic()) {
        segment.insert_str(0, "app");
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidcfg_core::descriptor::Descriptor;

    #[test]
    fn package_segment_sanitizes() {
        assert_eq!(package_segment("RavenGate"), "ravengate");
        assert_eq!(package_segment("my-app"), "my_app");
        assert_eq!(package_segment("2048"), "app2048");
        assert_eq!(package_segment(""), "app");
    }

    #[test]
    fn init_writes_parseable_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ravengate");
        std::fs::create_dir(&dir).unwrap();

        let written = init(&dir, &InitOptions::default()).unwrap();
        assert_eq!(written.len(), 3);
        let d = Descriptor::from_path(&dir.join(DESCRIPTOR_FILE)).unwrap();
        assert_eq!(d.target.application_id, "com.example.ravengate");
        assert!(d.target.version_code.is_inherited());
    }

    #[test]
    fn init_refuses_existing_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(DESCRIPTOR_FILE), "").unwrap();
        assert!(init(tmp.path(), &InitOptions::default()).is_err());
    }

    #[test]
    fn init_rejects_bad_application_id_and_template() {
        let tmp = tempfile::tempdir().unwrap();
        let bad_id = InitOptions {
            application_id: Some("notes".into()),
            ..Default::default()
        };
        assert!(init(tmp.path(), &bad_id).is_err());

        let bad_template = InitOptions {
            template: "ios".into(),
            ..Default::default()
        };
        let err = init(tmp.path(), &bad_template).unwrap_err();
        assert!(err.to_string().contains("android, flutter"));
        assert!(!tmp.path().join(DESCRIPTOR_FILE).exists());
    }
}
