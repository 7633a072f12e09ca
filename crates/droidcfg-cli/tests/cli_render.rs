use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn droidcfg_cmd() -> Command {
    Command::cargo_bin("droidcfg").unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_render_to_stdout() {
    droidcfg_cmd()
        .arg("--manifest")
        .arg(fixture("ravengate.toml"))
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("plugins {"))
        .stdout(predicate::str::contains("implementation(kotlin(\"stdlib-jdk7\"))"))
        .stdout(predicate::str::contains(
            "signingConfig = signingConfigs.getByName(\"debug\")",
        ));
}

#[test]
fn test_render_to_file_keeps_secrets_out() {
    let tmp = TempDir::new().unwrap();
    fs::copy(fixture("android-release.toml"), tmp.path().join("Droidcfg.toml")).unwrap();
    fs::copy(fixture("test.droidcfg.env"), tmp.path().join(".droidcfg.env")).unwrap();

    droidcfg_cmd()
        .current_dir(tmp.path())
        .args(["render", "-o", "build.gradle.kts"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let script = fs::read_to_string(tmp.path().join("build.gradle.kts")).unwrap();
    assert!(script.contains("System.getenv(\"UPLOAD_STORE_PASSWORD\")"));
    assert!(!script.contains("store-s3cret"));
}
