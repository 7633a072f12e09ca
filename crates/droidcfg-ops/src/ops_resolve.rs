//! Operation: print a descriptor with every inherited field resolved.

use droidcfg_core::descriptor::Descriptor;
use droidcfg_core::resolve::resolve;
use droidcfg_util::errors::DroidcfgError;

use crate::Session;

/// Output format for `droidcfg resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveFormat {
    #[default]
    Toml,
    Json,
}

/// Resolve the session's descriptor and serialize the concrete view.
///
/// Only inheritance is resolved here; `check` runs the full validation.
/// The descriptor is re-read without `${env:VAR}` interpolation so signing
/// secrets are printed as references, never as their values.
pub fn resolve_descriptor(session: &Session, format: ResolveFormat) -> miette::Result<String> {
    let raw = Descriptor::from_path_raw(&session.descriptor_path)?;
    let resolved = resolve(&raw, &session.provider)?;
    let view = resolved.view();
    let out = match format {
        ResolveFormat::Toml => toml::to_string_pretty(&view).map_err(|e| DroidcfgError::Generic {
            message: format!("Failed to serialize resolved descriptor: {e}"),
        })?,
        ResolveFormat::Json => {
            serde_json::to_string_pretty(&view).map_err(|e| DroidcfgError::Generic {
                message: format!("Failed to serialize resolved descriptor: {e}"),
            })?
        }
    };
    Ok(out)
}
