use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for droidcfg operations that are not descriptor
/// validation findings.
#[derive(Debug, Error, Diagnostic)]
pub enum DroidcfgError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed descriptor (e.g. Droidcfg.toml).
    #[error("Descriptor error: {message}")]
    #[diagnostic(
        code(droidcfg::descriptor),
        help("Check your Droidcfg.toml for syntax errors")
    )]
    Descriptor { message: String },

    /// A shared-version source (local.properties, --set values) is unusable.
    #[error("Version provider error: {message}")]
    #[diagnostic(code(droidcfg::provider))]
    Provider { message: String },

    /// Global configuration (~/.droidcfg/config.toml) could not be loaded.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(droidcfg::config))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DroidcfgResult<T> = miette::Result<T>;
