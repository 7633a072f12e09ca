//! Operation: add a dependency to Droidcfg.toml.

use std::path::Path;

use droidcfg_core::dependency::{Configuration, Coordinate, DependencyRef};
use droidcfg_core::descriptor::Descriptor;
use droidcfg_util::errors::DroidcfgError;
use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};

/// Options for `droidcfg add`.
pub struct AddOptions {
    /// The dependency spec: `group:artifact[:version]`.
    pub spec: String,
    /// Gradle configuration name; `implementation` when absent.
    pub configuration: Option<String>,
}

/// Append a `[[dependencies]]` entry using format-preserving edits.
///
/// Comments and ordering in the rest of the file are untouched. The edited
/// document must still parse as a descriptor before it is written.
pub fn add_dependency(descriptor_path: &Path, opts: &AddOptions) -> miette::Result<DependencyRef> {
    let content = std::fs::read_to_string(descriptor_path).map_err(|e| {
        DroidcfgError::Descriptor {
            message: format!("Failed to read {}: {e}", descriptor_path.display()),
        }
    })?;

    let mut doc: DocumentMut = content.parse().map_err(|e| DroidcfgError::Descriptor {
        message: format!("Failed to parse {}: {e}", descriptor_path.display()),
    })?;

    let coord = Coordinate::parse(&opts.spec).ok_or_else(|| DroidcfgError::Generic {
        message: format!(
            "Invalid dependency format: '{}'. Expected group:artifact[:version]",
            opts.spec
        ),
    })?;
    let configuration = match opts.configuration.as_deref() {
        None => Configuration::default(),
        Some(name) => Configuration::parse(name).ok_or_else(|| DroidcfgError::Generic {
            message: format!(
                "Unknown configuration '{name}'. Expected one of: implementation, api, compileOnly, runtimeOnly, coreLibraryDesugaring, testImplementation"
            ),
        })?,
    };

    let deps = dependencies_array(&mut doc)?;
    let module = coord.module();
    let duplicate = deps.iter().any(|t| {
        let same_config = t
            .get("configuration")
            .and_then(|c| c.as_str())
            .map_or(Some(Configuration::default()), Configuration::parse)
            == Some(configuration);
        let same_module = t
            .get("coordinate")
            .and_then(|c| c.as_str())
            .and_then(Coordinate::parse)
            .is_some_and(|c| c.module() == module);
        same_config && same_module
    });
    if duplicate {
        return Err(DroidcfgError::Generic {
            message: format!(
                "{module} is already declared in `{}`",
                configuration.as_str()
            ),
        }
        .into());
    }

    let mut entry = Table::new();
    entry.insert("configuration", value(configuration.as_str()));
    entry.insert("coordinate", value(coord.to_string()));
    deps.push(entry);

    let updated = doc.to_string();
    Descriptor::from_str(&updated)?;
    std::fs::write(descriptor_path, updated).map_err(DroidcfgError::Io)?;
    tracing::debug!("Added {coord} to {}", descriptor_path.display());

    Ok(DependencyRef::new(configuration, coord.to_string()))
}

/// The `[[dependencies]]` array, created if absent.
fn dependencies_array(doc: &mut DocumentMut) -> miette::Result<&mut ArrayOfTables> {
    if !doc.contains_key("dependencies") {
        doc.insert("dependencies", Item::ArrayOfTables(ArrayOfTables::new()));
    }
    match doc.get_mut("dependencies") {
        Some(Item::ArrayOfTables(aot)) => Ok(aot),
        _ => Err(DroidcfgError::Descriptor {
            message: "`dependencies` must be an array of tables ([[dependencies]])".to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"# Project descriptor
[target]
application-id = "com.example.app"
min-sdk = 21 # keep in sync with the Play listing
target-sdk = 34
compile-sdk = 34
version-code = 1
version-name = "1.0"
"#;

    fn write_base(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("Droidcfg.toml");
        std::fs::write(&path, BASE).unwrap();
        path
    }

    #[test]
    fn add_to_dependencies() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_base(tmp.path());

        let dep = add_dependency(
            &path,
            &AddOptions {
                spec: "androidx.core:core-ktx:1.15.0".to_string(),
                configuration: None,
            },
        )
        .unwrap();
        assert_eq!(dep.configuration, Configuration::Implementation);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Project descriptor"));
        assert!(content.contains("min-sdk = 21 # keep in sync with the Play listing"));
        assert!(content.contains("[[dependencies]]"));
        assert!(content.contains("coordinate = \"androidx.core:core-ktx:1.15.0\""));

        let d = Descriptor::from_str(&content).unwrap();
        assert_eq!(d.dependencies.len(), 1);
    }

    #[test]
    fn add_with_configuration_appends_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_base(tmp.path());

        for (spec, config) in [
            ("androidx.core:core-ktx:1.15.0", None),
            ("junit:junit:4.13.2", Some("testImplementation")),
        ] {
            add_dependency(
                &path,
                &AddOptions {
                    spec: spec.to_string(),
                    configuration: config.map(String::from),
                },
            )
            .unwrap();
        }

        let d = Descriptor::from_path_raw(&path).unwrap();
        assert_eq!(d.dependencies[1].configuration, Configuration::TestImplementation);
        assert_eq!(d.dependencies[1].coordinate, "junit:junit:4.13.2");
    }

    #[test]
    fn duplicate_module_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_base(tmp.path());
        let opts = AddOptions {
            spec: "androidx.core:core-ktx:1.15.0".to_string(),
            configuration: None,
        };
        add_dependency(&path, &opts).unwrap();
        let again = AddOptions {
            spec: "androidx.core:core-ktx:1.16.0".to_string(),
            configuration: Some("implementation".to_string()),
        };
        assert!(add_dependency(&path, &again).is_err());
    }

    #[test]
    fn invalid_spec_and_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_base(tmp.path());

        let bad_spec = AddOptions {
            spec: "invalid-spec".to_string(),
            configuration: None,
        };
        assert!(add_dependency(&path, &bad_spec).is_err());

        let bad_config = AddOptions {
            spec: "junit:junit:4.13.2".to_string(),
            configuration: Some("kapt".to_string()),
        };
        assert!(add_dependency(&path, &bad_config).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), BASE);
    }
}
