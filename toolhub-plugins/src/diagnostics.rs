//! Host diagnostics panel

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use toolhub_plugin::{
    register_capability, Action, Capability, CapabilityDescriptor, CapabilityVersion, Category, Cleanup,
    ExecutionContext, Item, LogLevel, Panel, PluginResult, Section, StatusLevel, Toolbar,
};

struct Session {
    context: Arc<dyn ExecutionContext>,
    started_at: DateTime<Utc>,
}

/// Read-only view of the environment the host runs in
pub struct HostDiagnosticsCapability {
    descriptor: CapabilityDescriptor,
    session: RwLock<Option<Session>>,
}

impl HostDiagnosticsCapability {
    pub const ID: &'static str = "toolhub.host-diagnostics";

    pub fn new() -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                Self::ID,
                "Host Diagnostics",
                CapabilityVersion::new(1, 0, 0),
                "Environment and configuration health of this host",
                "Toolhub Team",
                Category::Monitoring,
            ),
            session: RwLock::new(None),
        }
    }
}

impl Default for HostDiagnosticsCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl Capability for HostDiagnosticsCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, context: Arc<dyn ExecutionContext>) -> PluginResult<()> {
        context.log(LogLevel::Debug, "Host diagnostics ready", None);
        *self.session.get_mut() = Some(Session {
            context,
            started_at: Utc::now(),
        });
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.session.read().is_some()
    }

    fn cleanup(&self) -> Cleanup {
        // Holds nothing beyond the shared context
        self.session.write().take();
        Cleanup::NotNeeded
    }

    fn content(&self) -> Panel {
        let guard = self.session.read();
        let Some(ref session) = *guard else {
            return Panel::new(self.descriptor.name.clone());
        };
        let context = session.context.as_ref();
        let text = |key: &str| context.get_text(key, &[]);

        let environment = Section::new(text("diagnostics.section.environment"))
            .with_item(Item::text(format!("{}: {}", text("diagnostics.os"), std::env::consts::OS)))
            .with_item(Item::text(format!("{}: {}", text("diagnostics.arch"), std::env::consts::ARCH)))
            .with_item(Item::text(format!(
                "{}: {}",
                text("diagnostics.started"),
                session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            )));

        let config_level = match context.get_config_value("server.host") {
            Some(_) => StatusLevel::Ok,
            None => StatusLevel::Warning,
        };

        let port_level = match context
            .get_config_value("server.port")
            .or_else(|| context.get_config_value("server.default_port"))
        {
            Some(raw) if raw.trim().parse::<u16>().is_ok_and(|port| port > 0) => StatusLevel::Ok,
            Some(_) => StatusLevel::Error,
            None => StatusLevel::Warning,
        };

        let checks = Section::new(text("diagnostics.section.checks"))
            .with_item(Item::status(text("diagnostics.check.config"), config_level))
            .with_item(Item::status(text("diagnostics.check.port"), port_level));

        Panel::new(text("diagnostics.title"))
            .with_section(environment)
            .with_section(checks)
    }

    fn toolbar(&self) -> Toolbar {
        match *self.session.read() {
            Some(ref session) => Toolbar::Actions(vec![Action::new(
                "refresh",
                session.context.get_text("diagnostics.action.refresh", &[]),
            )]),
            None => Toolbar::None,
        }
    }
}

register_capability!(HostDiagnosticsCapability::new());

#[cfg(test)]
mod tests {
    use super::*;
    use toolhub_plugin::{HostContext, TextCatalog};

    fn context(locale: &str, settings: &[(&str, &str)]) -> Arc<dyn ExecutionContext> {
        let mut catalog = TextCatalog::with_host_defaults("en").unwrap();
        crate::install_messages(&mut catalog).unwrap();

        let mut builder = HostContext::builder().with_catalog(catalog).with_locale(locale);
        for (key, value) in settings {
            builder = builder.with_setting(*key, *value);
        }
        Arc::new(builder.build())
    }

    fn statuses(panel: &Panel) -> Vec<(String, StatusLevel)> {
        panel
            .sections
            .iter()
            .flat_map(|section| section.items.iter())
            .filter_map(|item| match item {
                Item::Status { label, level } => Some((label.clone(), *level)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unavailable_until_initialized() {
        let capability = HostDiagnosticsCapability::new();
        assert!(!capability.is_available());
        assert_eq!(capability.toolbar(), Toolbar::None);
        assert_eq!(capability.content().title, "Host Diagnostics");
    }

    #[test]
    fn test_checks_reflect_settings() {
        let mut capability = HostDiagnosticsCapability::new();
        capability
            .initialize(context("en", &[("server.host", "10.0.0.5"), ("server.port", "abc")]))
            .unwrap();

        let panel = capability.content();
        assert_eq!(
            statuses(&panel),
            vec![
                ("Server settings present".to_string(), StatusLevel::Ok),
                ("Server port valid".to_string(), StatusLevel::Error),
            ]
        );
        assert!(panel.render_text().contains(std::env::consts::OS));
    }

    #[test]
    fn test_localized_labels() {
        let mut capability = HostDiagnosticsCapability::new();
        capability.initialize(context("de-DE", &[])).unwrap();

        assert_eq!(capability.content().title, "Hostdiagnose");
        assert_eq!(capability.toolbar().render_text().unwrap(), "[ Aktualisieren ]");
    }

    #[test]
    fn test_cleanup() {
        let mut capability = HostDiagnosticsCapability::new();
        capability.initialize(context("en", &[])).unwrap();
        assert!(capability.is_available());

        assert_eq!(capability.cleanup(), Cleanup::NotNeeded);
        assert!(!capability.is_available());
    }
}
