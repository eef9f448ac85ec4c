//! Domain-specific configuration modules

pub mod locale;
pub mod logging;
pub mod plugins;
pub mod utils;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main Toolhub configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ToolhubConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Capability enablement
    #[serde(default)]
    pub plugins: plugins::PluginsConfig,

    /// Localization configuration
    #[serde(default)]
    pub locale: locale::LocaleConfig,

    /// Flat string-keyed values exposed to capabilities
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl ToolhubConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.logging.validate()?;
        self.plugins.validate()?;
        self.locale.validate()?;

        if let Some(key) = self.settings.keys().find(|key| key.trim().is_empty()) {
            return Err(ConfigError::DomainError {
                domain: "settings".to_string(),
                message: format!("setting key '{}' cannot be blank", key),
            });
        }

        Ok(())
    }

    /// Look up a flat setting by key
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = ToolhubConfig::default();
        config
            .settings
            .insert("server.default_port".to_string(), "8080".to_string());
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
