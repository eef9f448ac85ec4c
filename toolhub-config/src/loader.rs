//! Configuration loading and environment variable handling

use crate::domains::ToolhubConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "TOOLHUB".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ToolhubConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: ToolhubConfig = if content.trim().is_empty() {
            ToolhubConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ToolhubConfig> {
        let mut config = ToolhubConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<&Path>) -> ConfigResult<ToolhubConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut ToolhubConfig) -> ConfigResult<()> {
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_locale_overrides(&mut config.locale);
        self.apply_plugin_overrides(&mut config.plugins);
        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Apply locale config overrides
    fn apply_locale_overrides(&self, config: &mut crate::domains::locale::LocaleConfig) {
        if let Ok(locale) = self.get_env_var("LOCALE") {
            config.locale = Some(locale);
        }

        if let Ok(dir) = self.get_env_var("MESSAGES_DIR") {
            config.messages_dir = Some(PathBuf::from(dir));
        }
    }

    /// Apply plugin config overrides
    fn apply_plugin_overrides(&self, config: &mut crate::domains::plugins::PluginsConfig) {
        if let Ok(disabled) = self.get_env_var("DISABLED_PLUGINS") {
            config.disabled = disabled
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
