//! Handler for `droidcfg render`.

use std::path::Path;

use miette::Result;

pub fn exec(manifest: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let path = super::descriptor_path(manifest)?;
    let script = droidcfg_ops::ops_render::render(&path, output)?;
    if output.is_none() {
        print!("{script}");
    }
    Ok(())
}
