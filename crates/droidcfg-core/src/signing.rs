use serde::{Deserialize, Serialize};

/// Name of the signing profile every Android target has implicitly.
pub const DEBUG_PROFILE: &str = "debug";

/// A named signing identity from `[signing-configs.<name>]`.
///
/// Passwords are usually `${env:VAR}` references resolved from `.droidcfg.env`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    #[serde(default, rename = "store-file", skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    #[serde(default, rename = "store-password", skip_serializing_if = "Option::is_none")]
    pub store_password: Option<String>,
    #[serde(default, rename = "key-alias", skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    #[serde(default, rename = "key-password", skip_serializing_if = "Option::is_none")]
    pub key_password: Option<String>,
}

/// Per-variant settings from `[build-types.<name>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildType {
    #[serde(default, rename = "signing-config", skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub minify: bool,
    #[serde(default, rename = "shrink-resources", skip_serializing_if = "is_false")]
    pub shrink_resources: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Returns `true` if `name` is the implicit debug profile.
pub fn is_builtin_profile(name: &str) -> bool {
    name == DEBUG_PROFILE
}
