//! Built-in capabilities for Toolhub
//!
//! Each capability registers itself with `register_capability!`, so linking
//! this crate is enough for `InventoryCapabilitySource` to find them.
//! [`builtin_source`] offers the same set as an explicit table.

pub mod diagnostics;
pub mod server_config;

pub use diagnostics::HostDiagnosticsCapability;
pub use server_config::{ServerConfigurationCapability, ServerSettings};

use toolhub_plugin::{Capability, PluginResult, StaticCapabilitySource, TextCatalog};

/// Message bundles for the built-in capabilities, by locale
pub const MESSAGE_BUNDLES: [(&str, &str); 2] = [
    ("en", include_str!("../resources/messages_en.yaml")),
    ("de", include_str!("../resources/messages_de.yaml")),
];

/// Merge the built-in capabilities' strings into a host catalog
pub fn install_messages(catalog: &mut TextCatalog) -> PluginResult<()> {
    for (locale, yaml) in MESSAGE_BUNDLES {
        catalog.load_bundle_str(locale, yaml)?;
    }
    Ok(())
}

fn server_configuration() -> Box<dyn Capability> {
    Box::new(ServerConfigurationCapability::new())
}

fn host_diagnostics() -> Box<dyn Capability> {
    Box::new(HostDiagnosticsCapability::new())
}

/// Explicit registration table of every built-in capability
pub fn builtin_source() -> StaticCapabilitySource {
    StaticCapabilitySource::new()
        .with_factory(server_configuration)
        .with_factory(host_diagnostics)
}
