//! Operation: resolve and validate a descriptor.

use droidcfg_core::provider::VersionProvider;
use droidcfg_core::validate::{evaluate, Validated};
use droidcfg_util::progress;

use crate::Session;

/// Resolve inherited fields and validate the session's descriptor.
///
/// Advisories are printed as warnings whatever the outcome. On failure the
/// returned report carries every validation error as a related diagnostic.
pub fn check(session: &Session, verbose: bool) -> miette::Result<Validated> {
    let d = &session.descriptor;
    progress::status(
        "Checking",
        &format!(
            "{} ({})",
            d.target.application_id,
            session.descriptor_path.display()
        ),
    );
    if verbose {
        progress::status_info("Providers", session.provider.name());
    }

    match evaluate(d, &session.provider, &session.floors) {
        Ok(validated) => {
            if verbose {
                for (field, key) in &validated.descriptor.inherited {
                    progress::status_info("Inherited", &format!("{field} from `{key}`"));
                }
            }
            for advisory in &validated.advisories {
                progress::status_warn("warning", &advisory.to_string());
            }
            let t = &validated.descriptor.target;
            progress::status(
                "Finished",
                &format!(
                    "{} v{} ({}) minSdk {} targetSdk {} compileSdk {}",
                    t.application_id,
                    t.version_name,
                    t.version_code,
                    t.min_sdk,
                    t.target_sdk,
                    t.compile_sdk
                ),
            );
            Ok(validated)
        }
        Err(failure) => {
            for advisory in &failure.advisories {
                progress::status_warn("warning", &advisory.to_string());
            }
            tracing::debug!("{} validation error(s)", failure.errors.len());
            Err(failure.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderOptions;
    use droidcfg_core::config::GlobalConfig;
    use droidcfg_core::validate::{AdvisoryCode, ValidationFailure};

    const DESCRIPTOR: &str = r#"
[target]
application-id = "com.example.app"
min-sdk = 21
target-sdk = { inherit = "flutter.targetSdkVersion" }
compile-sdk = { inherit = "flutter.compileSdkVersion" }
version-code = { inherit = "flutter.versionCode" }
version-name = { inherit = "flutter.versionName" }

[build-types.release]
signing-config = "debug"
"#;

    fn session(dir: &std::path::Path, opts: &ProviderOptions) -> Session {
        let path = dir.join("Droidcfg.toml");
        std::fs::write(&path, DESCRIPTOR).unwrap();
        Session::open_with_config(&path, opts, &GlobalConfig::default()).unwrap()
    }

    #[test]
    fn check_passes_with_local_properties() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("local.properties"),
            "flutter.versionCode=3\nflutter.versionName=0.3.0\n",
        )
        .unwrap();
        let s = session(tmp.path(), &ProviderOptions::default());
        let validated = check(&s, true).unwrap();
        assert_eq!(validated.descriptor.target.version_code, 3);
        assert_eq!(validated.advisories[0].code, AdvisoryCode::ReleaseDebugSigning);
    }

    #[test]
    fn check_fails_without_version_values() {
        let tmp = tempfile::tempdir().unwrap();
        let s = session(
            tmp.path(),
            &ProviderOptions {
                assignments: vec!["flutter.versionName=1.0".into()],
                offline_defaults: true,
            },
        );
        let report = check(&s, false).unwrap_err();
        let failure = report.downcast_ref::<ValidationFailure>().unwrap();
        assert_eq!(failure.errors.len(), 1);
        assert!(failure.errors[0].to_string().contains("flutter.versionCode"));
    }
}
