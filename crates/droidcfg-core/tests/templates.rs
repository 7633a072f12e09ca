use droidcfg_core::descriptor::Descriptor;
use droidcfg_core::floors::FloorCatalog;
use droidcfg_core::provider::MapProvider;
use droidcfg_core::template::{interpolate, TemplateContext, TemplateRegistry};
use droidcfg_core::validate::evaluate;
use tempfile::tempdir;

#[test]
fn registry_lists_builtin_templates() {
    let registry = TemplateRegistry::new().unwrap();
    assert_eq!(registry.names(), vec!["android", "flutter"]);
    assert!(registry.get("flutter").is_some());
    assert!(registry.get("ios").is_none());
    assert!(registry
        .list()
        .iter()
        .all(|(_, description)| !description.is_empty()));
}

#[test]
fn every_template_produces_a_valid_descriptor() {
    let registry = TemplateRegistry::new().unwrap();
    let ctx = TemplateContext::new("notes", "com.example.notes");
    let provider = MapProvider::new("test")
        .with("flutter.minSdkVersion", "21")
        .with("flutter.targetSdkVersion", "35")
        .with("flutter.compileSdkVersion", "35")
        .with("flutter.ndkVersion", "27.0.12077973")
        .with("flutter.versionCode", "1")
        .with("flutter.versionName", "1.0.0");

    for name in registry.names() {
        let template = registry.get(name).unwrap();
        let descriptor = Descriptor::from_str(&template.manifest(&ctx))
            .unwrap_or_else(|e| panic!("template {name} does not parse: {e:?}"));
        assert_eq!(descriptor.target.application_id, "com.example.notes");
        if let Err(failure) = evaluate(&descriptor, &provider, &FloorCatalog::builtin()) {
            panic!("template {name} is invalid: {:?}", failure.errors);
        }
    }
}

#[test]
fn render_writes_files_without_overwriting() {
    let tmp = tempdir().unwrap();
    let registry = TemplateRegistry::new().unwrap();
    let template = registry.get("flutter").unwrap();
    let ctx = TemplateContext::new("ravengate", "com.jaimevillalba.ravengate");

    std::fs::write(tmp.path().join(".gitignore"), "build/\n").unwrap();
    let written = template.render(tmp.path(), &ctx).unwrap();

    assert_eq!(written.len(), 2);
    assert!(tmp.path().join("Droidcfg.toml").is_file());
    assert!(tmp.path().join(".droidcfg.env").is_file());
    assert_eq!(
        std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap(),
        "build/\n"
    );

    let again = template.render(tmp.path(), &ctx).unwrap();
    assert!(again.is_empty());
}

#[test]
fn interpolation_leaves_unknown_placeholders() {
    let mut ctx = TemplateContext::new("app", "com.example.app");
    ctx.set("namespace", "com.example.app.core");
    assert_eq!(
        interpolate("{{application_id}} {{namespace}} {{missing}}", &ctx),
        "com.example.app com.example.app.core {{missing}}"
    );
}
