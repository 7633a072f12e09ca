use miette::Result;

use droidcfg_ops::ops_init::{self, InitOptions};
use droidcfg_util::errors::DroidcfgError;

pub fn exec(template: String, name: Option<String>, application_id: Option<String>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(DroidcfgError::Io)?;
    let written = ops_init::init(
        &cwd,
        &InitOptions {
            template,
            name,
            application_id,
        },
    )?;

    for path in &written {
        let shown = path.strip_prefix(&cwd).unwrap_or(path);
        droidcfg_util::progress::status("Created", &shown.display().to_string());
    }
    println!("Initialized droidcfg descriptor in {}", cwd.display());
    Ok(())
}
