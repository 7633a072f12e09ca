use std::path::PathBuf;

use droidcfg_core::descriptor::Descriptor;
use droidcfg_core::render::{kts_string, render_gradle_kts};

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
fn ravengate_renders_flutter_module_script() {
    let d = Descriptor::from_path(&fixture("ravengate.toml")).unwrap();
    let kts = render_gradle_kts(&d);

    assert!(kts.starts_with("plugins {\n    id(\"com.android.application\")\n"));
    let android = kts.find("id(\"com.android.application\")").unwrap();
    let kotlin = kts.find("id(\"kotlin-android\")").unwrap();
    let flutter = kts.find("id(\"dev.flutter.flutter-gradle-plugin\")").unwrap();
    assert!(android < kotlin && kotlin < flutter);

    assert!(kts.contains("namespace = \"com.jaimevillalba.ravengate\""));
    assert!(kts.contains("compileSdk = flutter.compileSdkVersion"));
    assert!(kts.contains("ndkVersion = \"27.0.12077973\""));
    assert!(kts.contains("sourceCompatibility = JavaVersion.VERSION_1_8"));
    assert!(kts.contains("targetCompatibility = JavaVersion.VERSION_1_8"));
    assert!(kts.contains("isCoreLibraryDesugaringEnabled = true"));
    assert!(kts.contains("jvmTarget = \"1.8\""));
    assert!(kts.contains("minSdk = 23"));
    assert!(kts.contains("targetSdk = flutter.targetSdkVersion"));
    assert!(kts.contains("versionCode = flutter.versionCode"));
    assert!(kts.contains("versionName = flutter.versionName"));
    assert!(kts.contains(
        "        release {\n            signingConfig = signingConfigs.getByName(\"debug\")\n        }"
    ));
    assert!(kts.contains("flutter {\n    source = \"../..\"\n}"));
    assert!(kts.contains("implementation(kotlin(\"stdlib-jdk7\"))"));
    assert!(kts.contains("coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.1.5\")"));
    assert!(!kts.contains("signingConfigs {"));
}

#[test]
fn env_secrets_render_as_getenv() {
    let d = Descriptor::from_path_raw(&fixture("android-release.toml")).unwrap();
    let kts = render_gradle_kts(&d);

    assert!(kts.contains("create(\"upload\") {"));
    assert!(kts.contains("storePassword = System.getenv(\"UPLOAD_STORE_PASSWORD\")"));
    assert!(kts.contains("keyPassword = System.getenv(\"UPLOAD_KEY_PASSWORD\")"));
    assert!(!kts.contains("s3cret"));
    assert!(kts.contains("isMinifyEnabled = true"));
    assert!(kts.contains("isShrinkResources = true"));
    assert!(kts.contains("id(\"org.jetbrains.kotlin.android\") version \"2.1.0\""));
    assert!(kts.contains("testImplementation(\"junit:junit:4.13.2\")"));
    assert!(!kts.contains("flutter {"));
}

#[test]
fn separate_version_is_folded_into_notation() {
    let d = Descriptor::from_str(
        r#"
[target]
application-id = "com.example.app"
min-sdk = 21
target-sdk = 34
compile-sdk = 34
version-code = 1
version-name = "1.0"

[build-types.staging]
minify = true

[[dependencies]]
configuration = "api"
coordinate = "com.squareup.okhttp3:okhttp"
version = "4.12.0"
"#,
    )
    .unwrap();
    let kts = render_gradle_kts(&d);
    assert!(kts.contains("api(\"com.squareup.okhttp3:okhttp:4.12.0\")"));
    assert!(kts.contains("create(\"staging\") {"));
    assert!(kts.contains("versionName = \"1.0\""));
    assert!(!kts.contains("compileOptions"));
    assert!(!kts.contains("ndkVersion"));
}

#[test]
fn kotlin_strings_are_escaped() {
    assert_eq!(kts_string("plain"), "\"plain\"");
    assert_eq!(kts_string("a\"b"), "\"a\\\"b\"");
    assert_eq!(kts_string("c:\\keys"), "\"c:\\\\keys\"");
    assert_eq!(kts_string("$HOME"), "\"\\$HOME\"");
    assert_eq!(kts_string("${env:KEY}"), "System.getenv(\"KEY\")");
}
