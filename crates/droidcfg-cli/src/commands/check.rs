//! Check command implementation.

use std::path::Path;

use miette::Result;

use droidcfg_ops::{ops_check, ProviderOptions, Session};

pub fn exec(
    manifest: Option<&Path>,
    set: Vec<String>,
    offline_defaults: bool,
    verbose: bool,
) -> Result<()> {
    let path = super::descriptor_path(manifest)?;
    let session = Session::open(
        &path,
        &ProviderOptions {
            assignments: set,
            offline_defaults,
        },
    )?;
    ops_check::check(&session, verbose)?;
    Ok(())
}
