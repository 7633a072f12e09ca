//! Operations behind each `droidcfg` command.
//!
//! Every operation takes explicit paths and options so it can be driven from
//! the CLI or from tests without touching the process working directory.

pub mod ops_add;
pub mod ops_check;
pub mod ops_init;
pub mod ops_render;
pub mod ops_resolve;

use std::path::{Path, PathBuf};

use droidcfg_core::config::GlobalConfig;
use droidcfg_core::descriptor::Descriptor;
use droidcfg_core::floors::{FloorCatalog, FloorOrigin};
use droidcfg_core::provider::{ChainProvider, FlutterProvider, MapProvider, VersionProvider};
use droidcfg_core::DESCRIPTOR_FILE;
use droidcfg_util::errors::DroidcfgError;

/// Where provider values come from for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// `key=value` overrides from `--set`, consulted first.
    pub assignments: Vec<String>,
    /// Skip `local.properties` and use only overrides plus SDK defaults.
    pub offline_defaults: bool,
}

/// Find the descriptor to operate on.
///
/// An explicit `--manifest` path wins; otherwise the nearest `Droidcfg.toml`
/// in `start` or one of its ancestors.
pub fn locate_descriptor(start: &Path, explicit: Option<&Path>) -> miette::Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DroidcfgError::Descriptor {
            message: format!("{} does not exist", path.display()),
        }
        .into());
    }
    droidcfg_util::fs::find_ancestor_with(start, DESCRIPTOR_FILE)
        .map(|dir| dir.join(DESCRIPTOR_FILE))
        .ok_or_else(|| {
            DroidcfgError::Descriptor {
                message: format!(
                    "could not find {DESCRIPTOR_FILE} in {} or any parent directory",
                    start.display()
                ),
            }
            .into()
        })
}

/// Everything needed to resolve and validate one descriptor.
pub struct Session {
    pub descriptor_path: PathBuf,
    pub descriptor: Descriptor,
    pub provider: ChainProvider,
    pub floors: FloorCatalog,
}

impl Session {
    /// Load the descriptor at `descriptor_path` with the user's global config.
    pub fn open(descriptor_path: &Path, opts: &ProviderOptions) -> miette::Result<Self> {
        let config = GlobalConfig::load()?;
        Self::open_with_config(descriptor_path, opts, &config)
    }

    pub fn open_with_config(
        descriptor_path: &Path,
        opts: &ProviderOptions,
        config: &GlobalConfig,
    ) -> miette::Result<Self> {
        let descriptor = Descriptor::from_path(descriptor_path)?;
        let dir = descriptor_path.parent().unwrap_or(Path::new("."));
        let provider = build_provider(dir, config, opts)?;
        tracing::debug!("Provider chain: {}", provider.name());
        Ok(Self {
            descriptor_path: descriptor_path.to_path_buf(),
            descriptor,
            provider,
            floors: floor_catalog(config),
        })
    }
}

/// `--set` overrides, then `local.properties` (unless offline), then the
/// Flutter SDK constants from the global config.
pub fn build_provider(
    descriptor_dir: &Path,
    config: &GlobalConfig,
    opts: &ProviderOptions,
) -> miette::Result<ChainProvider> {
    let mut chain = ChainProvider::new();
    let overrides =
        MapProvider::from_assignments("--set", opts.assignments.iter().map(|s| s.as_str()))?;
    if !overrides.is_empty() {
        chain.push(overrides);
    }

    let local = if opts.offline_defaults {
        None
    } else {
        FlutterProvider::locate(descriptor_dir)
    };
    match local {
        Some(path) => chain.push(FlutterProvider::load(&path, config.flutter.clone())?),
        None => {
            if !opts.offline_defaults {
                tracing::info!(
                    "No local.properties near {}, using SDK defaults only",
                    descriptor_dir.display()
                );
            }
            chain.push(FlutterProvider::from_parts(
                Default::default(),
                config.flutter.clone(),
            ));
        }
    }
    Ok(chain)
}

/// Built-in floors overridden by the global config's `[floors]`.
pub fn floor_catalog(config: &GlobalConfig) -> FloorCatalog {
    let mut catalog = FloorCatalog::builtin();
    catalog.extend_from(&config.floors, FloorOrigin::GlobalConfig);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("app/src/main");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join("app").join(DESCRIPTOR_FILE), "").unwrap();

        let found = locate_descriptor(&nested, None).unwrap();
        assert_eq!(found, tmp.path().join("app").join(DESCRIPTOR_FILE));
    }

    #[test]
    fn locate_explicit_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("Other.toml");
        assert!(locate_descriptor(tmp.path(), Some(&missing)).is_err());
        std::fs::write(&missing, "").unwrap();
        assert_eq!(locate_descriptor(tmp.path(), Some(&missing)).unwrap(), missing);
    }

    #[test]
    fn provider_chain_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("local.properties"),
            "flutter.versionCode=17\nflutter.versionName=1.4.2\n",
        )
        .unwrap();
        let config = GlobalConfig::default();

        let opts = ProviderOptions {
            assignments: vec!["flutter.versionCode=99".into()],
            offline_defaults: false,
        };
        let chain = build_provider(tmp.path(), &config, &opts).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.lookup("flutter.versionCode").as_deref(), Some("99"));
        assert_eq!(chain.lookup("flutter.versionName").as_deref(), Some("1.4.2"));

        let offline = ProviderOptions {
            assignments: vec![],
            offline_defaults: true,
        };
        let chain = build_provider(tmp.path(), &config, &offline).unwrap();
        assert_eq!(chain.lookup("flutter.versionName"), None);
        assert_eq!(chain.lookup("flutter.compileSdkVersion").as_deref(), Some("35"));
    }
}
