//! Host assembly: context, registry and the startup bootstrap

use std::sync::Arc;
use toolhub_config::ToolhubConfig;
use toolhub_plugin::{
    Bootstrap, BootstrapReport, CapabilityRegistry, CapabilitySource, ExecutionContext, HostContext,
    HostContextBuilder, LogSink, MemorySink, TracingSink,
};

/// Everything a command needs after startup
pub struct Host {
    pub context: Arc<HostContext>,
    pub registry: Arc<CapabilityRegistry>,
    pub report: BootstrapReport,
    /// Capability log records from this run, also forwarded to tracing
    pub records: Arc<MemorySink>,
}

impl Host {
    /// Build the shared context from configuration and bring up every
    /// capability `source` yields.
    ///
    /// Never fails: missing messages degrade to fallback text and a broken
    /// source leaves the registry empty.
    pub fn start(config: &ToolhubConfig, source: &dyn CapabilitySource) -> Self {
        let records = Arc::new(MemorySink::forwarding_to(Arc::new(TracingSink)));

        let mut builder = HostContextBuilder::from_config(config);
        if let Err(e) = toolhub_plugins::install_messages(builder.catalog_mut()) {
            tracing::warn!(target: "toolhub::host", error = %e, "Built-in tool messages not loaded");
        }

        let context = Arc::new(builder.with_sink(records.clone() as Arc<dyn LogSink>).build());
        let registry = Arc::new(CapabilityRegistry::new());

        tracing::debug!(
            target: "toolhub::host",
            session = %context.session_id(),
            locale = context.locale(),
            "Host context ready"
        );

        let report = Bootstrap::new(registry.clone(), context.clone() as Arc<dyn ExecutionContext>)
            .with_disabled(config.plugins.disabled.iter().cloned())
            .run(source);

        Self {
            context,
            registry,
            report,
            records,
        }
    }

    /// Localized host text
    pub fn text(&self, key: &str, args: &[&str]) -> String {
        self.context.get_text(key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolhub_plugin::{InventoryCapabilitySource, StaticCapabilitySource};
    use toolhub_plugins::{HostDiagnosticsCapability, ServerConfigurationCapability};

    #[test]
    fn test_start_registers_builtins() {
        let host = Host::start(&ToolhubConfig::default(), &InventoryCapabilitySource::new());

        assert!(host.report.is_clean());
        assert!(host.registry.contains(ServerConfigurationCapability::ID));
        assert!(host.registry.contains(HostDiagnosticsCapability::ID));
        assert!(!host.records.records().is_empty());
    }

    #[test]
    fn test_start_honours_disabled_and_locale() {
        let mut config = ToolhubConfig::default();
        config.plugins.disabled = vec![HostDiagnosticsCapability::ID.to_string()];
        config.locale.locale = Some("de".to_string());

        let host = Host::start(&config, &toolhub_plugins::builtin_source());

        assert_eq!(host.registry.len(), 1);
        assert_eq!(host.report.disabled, vec![HostDiagnosticsCapability::ID]);

        let capability = host.registry.get(ServerConfigurationCapability::ID).unwrap();
        assert_eq!(capability.content().title, "Serverkonfiguration");
        assert_eq!(host.text("nav.empty", &[]), "No tools available");
    }

    #[test]
    fn test_start_with_empty_source() {
        let host = Host::start(&ToolhubConfig::default(), &StaticCapabilitySource::new());
        assert!(host.registry.is_empty());
        assert!(host.report.registered.is_empty());
    }

    #[test]
    fn test_start_with_missing_messages_dir() {
        let mut config = ToolhubConfig::default();
        config.locale.messages_dir = Some("/nonexistent/toolhub/messages".into());
        config.locale.locale = Some("de".to_string());

        let host = Host::start(&config, &toolhub_plugins::builtin_source());

        assert!(host.report.is_clean());
        assert!(host.registry.contains(ServerConfigurationCapability::ID));
        assert!(host.registry.contains(HostDiagnosticsCapability::ID));
        // Built-in bundles still apply; host strings fall back to English
        let capability = host.registry.get(ServerConfigurationCapability::ID).unwrap();
        assert_eq!(capability.content().title, "Serverkonfiguration");
        assert_eq!(host.text("nav.empty", &[]), "No tools available");
    }

    #[test]
    fn test_start_with_malformed_bundle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages_en.yaml"), "nav.empty: [unclosed\n").unwrap();

        let mut config = ToolhubConfig::default();
        config.locale.messages_dir = Some(dir.path().to_path_buf());

        let host = Host::start(&config, &toolhub_plugins::builtin_source());
        assert_eq!(host.registry.len(), 2);
        assert_eq!(host.text("nav.empty", &[]), "No tools available");
    }
}
