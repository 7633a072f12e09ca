//! Command dispatch and handler modules.

mod add;
mod check;
mod init;
mod render;
mod resolve;

use std::path::{Path, PathBuf};

use miette::Result;

use droidcfg_util::errors::DroidcfgError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let manifest = cli.manifest.as_deref();
    match cli.command {
        Command::Check {
            set,
            offline_defaults,
        } => check::exec(manifest, set, offline_defaults, cli.verbose),
        Command::Resolve {
            json,
            set,
            offline_defaults,
        } => resolve::exec(manifest, json, set, offline_defaults),
        Command::Render { output } => render::exec(manifest, output.as_deref()),
        Command::Init {
            template,
            name,
            application_id,
        } => init::exec(template, name, application_id),
        Command::Add { dep, configuration } => add::exec(manifest, &dep, configuration),
    }
}

/// The descriptor selected by `--manifest` or found from the working directory.
fn descriptor_path(manifest: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(DroidcfgError::Io)?;
    let path = droidcfg_ops::locate_descriptor(&cwd, manifest)?;
    tracing::debug!("Using descriptor {}", path.display());
    Ok(path)
}
