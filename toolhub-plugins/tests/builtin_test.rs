//! Built-in capabilities brought up the way the host does it

use std::collections::BTreeSet;
use std::sync::Arc;

use toolhub_plugin::testing::recording_context;
use toolhub_plugin::{
    Bootstrap, CapabilityRegistry, CapabilitySource, Category, HostContext, InventoryCapabilitySource, LogLevel,
    TextCatalog,
};
use toolhub_plugins::{builtin_source, install_messages, HostDiagnosticsCapability, ServerConfigurationCapability};

fn ids(source: &dyn CapabilitySource) -> BTreeSet<String> {
    source
        .enumerate()
        .unwrap()
        .iter()
        .map(|c| c.descriptor().id.clone())
        .collect()
}

#[test]
fn test_inventory_matches_builtin_table() {
    let expected: BTreeSet<String> = [ServerConfigurationCapability::ID, HostDiagnosticsCapability::ID]
        .into_iter()
        .map(String::from)
        .collect();

    assert_eq!(ids(&builtin_source()), expected);
    assert_eq!(ids(&InventoryCapabilitySource::new()), expected);
}

#[test]
fn test_bootstrap_builtins() {
    let registry = Arc::new(CapabilityRegistry::new());
    let (context, sink) = recording_context();

    let report = Bootstrap::new(registry.clone(), context).run(&InventoryCapabilitySource::new());

    assert!(report.is_clean());
    assert_eq!(registry.available().len(), 2);
    assert_eq!(registry.get_by_category(Category::Configuration).len(), 1);
    assert_eq!(registry.get_by_category(Category::Monitoring).len(), 1);
    assert!(sink
        .records_at(LogLevel::Info)
        .iter()
        .any(|r| r.message == "Registered 2 capabilities"));

    let names: Vec<_> = registry.summaries().into_iter().map(|s| s.descriptor.name).collect();
    assert_eq!(names, vec!["Host Diagnostics", "Server Configuration"]);
}

#[test]
fn test_disabled_builtin() {
    let registry = Arc::new(CapabilityRegistry::new());
    let (context, _sink) = recording_context();

    let report = Bootstrap::new(registry.clone(), context)
        .with_disabled([HostDiagnosticsCapability::ID])
        .run(&builtin_source());

    assert_eq!(report.registered, vec![ServerConfigurationCapability::ID]);
    assert_eq!(report.disabled, vec![HostDiagnosticsCapability::ID]);
}

#[test]
fn test_german_content_through_registry() {
    let mut catalog = TextCatalog::with_host_defaults("en").unwrap();
    install_messages(&mut catalog).unwrap();
    let context = HostContext::builder()
        .with_catalog(catalog)
        .with_locale("de")
        .with_setting("server.host", "srv01")
        .build();

    let registry = Arc::new(CapabilityRegistry::new());
    Bootstrap::new(registry.clone(), Arc::new(context)).run(&builtin_source());

    let capability = registry.get(ServerConfigurationCapability::ID).unwrap();
    let text = capability.content().render_text();
    assert!(text.starts_with("Serverkonfiguration\n"));
    assert!(text.contains("  Host: srv01\n"));
    assert!(text.contains("  [x] TLS verwenden\n"));
    assert_eq!(capability.toolbar().render_text().unwrap(), "[ Speichern ] [ Zurücksetzen ]");

    let json = serde_json::to_value(capability.toolbar()).unwrap();
    assert_eq!(json["actions"][0]["id"], "save");

    assert!(registry.unregister(ServerConfigurationCapability::ID));
    assert!(!capability.is_available());
}
