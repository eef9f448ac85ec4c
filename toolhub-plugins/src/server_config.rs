//! Server configuration form

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use toolhub_plugin::{
    register_capability, Action, Capability, CapabilityDescriptor, CapabilityVersion, Category, Cleanup,
    ExecutionContext, FieldKind, Item, LogLevel, Panel, PluginResult, Section, Toolbar,
};

/// Values shown in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub admin_user: String,
    pub admin_password: String,
    pub use_tls: bool,
    pub auto_restart: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            admin_user: "admin".to_string(),
            admin_password: String::new(),
            use_tls: true,
            auto_restart: false,
        }
    }
}

impl ServerSettings {
    /// Read `server.*` settings, keeping defaults for anything unset.
    ///
    /// `server.port` falls back to `server.default_port`. An unparsable port
    /// is logged and ignored.
    pub fn from_context(context: &dyn ExecutionContext) -> Self {
        let defaults = Self::default();

        let port = match context
            .get_config_value("server.port")
            .or_else(|| context.get_config_value("server.default_port"))
        {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    let fallback = defaults.port.to_string();
                    context.log(
                        LogLevel::Warn,
                        &context.get_text("server_config.invalid_port", &[raw.as_str(), fallback.as_str()]),
                        None,
                    );
                    defaults.port
                }
            },
            None => defaults.port,
        };

        Self {
            host: context.get_config_value("server.host").unwrap_or(defaults.host),
            port,
            admin_user: context.get_config_value("server.admin_user").unwrap_or(defaults.admin_user),
            admin_password: context
                .get_config_value("server.admin_password")
                .unwrap_or(defaults.admin_password),
            use_tls: flag(context, "server.use_tls").unwrap_or(defaults.use_tls),
            auto_restart: flag(context, "server.auto_restart").unwrap_or(defaults.auto_restart),
        }
    }
}

fn flag(context: &dyn ExecutionContext, key: &str) -> Option<bool> {
    match context.get_config_value(key)?.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Edits the connection and runtime settings of the managed server.
///
/// Edits live in memory only; `reset` restores what was loaded at
/// initialization.
pub struct ServerConfigurationCapability {
    descriptor: CapabilityDescriptor,
    context: RwLock<Option<Arc<dyn ExecutionContext>>>,
    loaded: RwLock<ServerSettings>,
    current: RwLock<ServerSettings>,
    available: AtomicBool,
}

impl ServerConfigurationCapability {
    pub const ID: &'static str = "toolhub.server-config";

    pub fn new() -> Self {
        let descriptor = CapabilityDescriptor::new(
            Self::ID,
            "Server Configuration",
            CapabilityVersion::new(1, 0, 0),
            "Connection and runtime settings for the managed server",
            "Toolhub Team",
            Category::Configuration,
        );

        Self {
            descriptor,
            context: RwLock::new(None),
            loaded: RwLock::new(ServerSettings::default()),
            current: RwLock::new(ServerSettings::default()),
            available: AtomicBool::new(false),
        }
    }

    /// Current form values
    pub fn settings(&self) -> ServerSettings {
        self.current.read().clone()
    }

    /// Apply an edit to the form
    pub fn edit(&self, f: impl FnOnce(&mut ServerSettings)) {
        f(&mut self.current.write());
    }

    /// Whether the form differs from the loaded values
    pub fn is_dirty(&self) -> bool {
        *self.current.read() != *self.loaded.read()
    }

    /// Discard edits
    pub fn reset(&self) {
        *self.current.write() = self.loaded.read().clone();
    }

    fn text(&self, key: &str) -> String {
        match *self.context.read() {
            Some(ref context) => context.get_text(key, &[]),
            None => key.to_string(),
        }
    }
}

impl Default for ServerConfigurationCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl Capability for ServerConfigurationCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, context: Arc<dyn ExecutionContext>) -> PluginResult<()> {
        let settings = ServerSettings::from_context(context.as_ref());

        let port = settings.port.to_string();
        context.log(
            LogLevel::Debug,
            &context.get_text("server_config.loaded", &[settings.host.as_str(), port.as_str()]),
            None,
        );

        *self.loaded.get_mut() = settings.clone();
        *self.current.get_mut() = settings;
        *self.context.get_mut() = Some(context);
        self.available.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn cleanup(&self) -> Cleanup {
        self.available.store(false, Ordering::SeqCst);
        match self.context.write().take() {
            Some(_) => Cleanup::Released,
            None => Cleanup::NotNeeded,
        }
    }

    fn content(&self) -> Panel {
        let settings = self.settings();

        let connection = Section::new(self.text("server_config.section.connection"))
            .with_item(Item::field(self.text("server_config.host"), settings.host, FieldKind::Text))
            .with_item(Item::field(
                self.text("server_config.port"),
                settings.port.to_string(),
                FieldKind::Number,
            ))
            .with_item(Item::field(
                self.text("server_config.admin_user"),
                settings.admin_user,
                FieldKind::Text,
            ))
            .with_item(Item::field(
                self.text("server_config.admin_password"),
                settings.admin_password,
                FieldKind::Secret,
            ));

        let runtime = Section::new(self.text("server_config.section.runtime"))
            .with_item(Item::toggle(self.text("server_config.use_tls"), settings.use_tls))
            .with_item(Item::toggle(self.text("server_config.auto_restart"), settings.auto_restart));

        Panel::new(self.text("server_config.title"))
            .with_section(connection)
            .with_section(runtime)
    }

    fn toolbar(&self) -> Toolbar {
        Toolbar::Actions(vec![
            Action::new("save", self.text("server_config.action.save")),
            Action::new("reset", self.text("server_config.action.reset")),
        ])
    }
}

register_capability!(ServerConfigurationCapability::new());
