use std::path::Path;

use miette::Result;

use droidcfg_ops::ops_resolve::{self, ResolveFormat};
use droidcfg_ops::{ProviderOptions, Session};

pub fn exec(
    manifest: Option<&Path>,
    json: bool,
    set: Vec<String>,
    offline_defaults: bool,
) -> Result<()> {
    let path = super::descriptor_path(manifest)?;
    let session = Session::open(
        &path,
        &ProviderOptions {
            assignments: set,
            offline_defaults,
        },
    )?;
    let format = if json {
        ResolveFormat::Json
    } else {
        ResolveFormat::Toml
    };
    let out = ops_resolve::resolve_descriptor(&session, format)?;
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
