use droidcfg_util::errors::DroidcfgError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = DroidcfgError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_descriptor_error_display() {
    let err = DroidcfgError::Descriptor {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Descriptor error: bad syntax");
}

#[test]
fn test_provider_error_display() {
    let err = DroidcfgError::Provider {
        message: "local.properties unreadable".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Version provider error: local.properties unreadable"
    );
}

#[test]
fn test_config_error_display() {
    let err = DroidcfgError::Config {
        message: "bad floors".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad floors");
}

#[test]
fn test_generic_error_display() {
    let err = DroidcfgError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_descriptor_error_has_help() {
    use miette::Diagnostic;
    let err = DroidcfgError::Descriptor {
        message: "x".to_string(),
    };
    let help = err.help().map(|h| h.to_string());
    assert_eq!(help.as_deref(), Some("Check your Droidcfg.toml for syntax errors"));
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: DroidcfgError = io_err.into();
    assert!(matches!(err, DroidcfgError::Io(_)));
}
