//! Handler for `droidcfg add`.

use std::path::Path;

use miette::Result;

use droidcfg_ops::ops_add::{self, AddOptions};

pub fn exec(manifest: Option<&Path>, dep: &str, configuration: Option<String>) -> Result<()> {
    let path = super::descriptor_path(manifest)?;
    let added = ops_add::add_dependency(
        &path,
        &AddOptions {
            spec: dep.to_string(),
            configuration,
        },
    )?;
    droidcfg_util::progress::status(
        "Adding",
        &format!("{} to `{}`", added.coordinate, added.configuration.as_str()),
    );
    Ok(())
}
