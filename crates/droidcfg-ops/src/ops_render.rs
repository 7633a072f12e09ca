//! Operation: render `Droidcfg.toml` as `build.gradle.kts`.

use std::path::Path;

use droidcfg_core::descriptor::Descriptor;
use droidcfg_core::render::render_gradle_kts;
use droidcfg_util::errors::DroidcfgError;

/// Render the descriptor at `descriptor_path`.
///
/// The descriptor is read without `${env:VAR}` interpolation so secrets
/// stay references in the generated script. With `output`, the script is
/// written there as well as returned.
pub fn render(descriptor_path: &Path, output: Option<&Path>) -> miette::Result<String> {
    let descriptor = Descriptor::from_path_raw(descriptor_path)?;
    let script = render_gradle_kts(&descriptor);

    if let Some(out) = output {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            droidcfg_util::fs::ensure_dir(parent).map_err(DroidcfgError::Io)?;
        }
        std::fs::write(out, &script).map_err(DroidcfgError::Io)?;
        droidcfg_util::progress::status("Rendered", &out.display().to_string());
    }
    Ok(script)
}
