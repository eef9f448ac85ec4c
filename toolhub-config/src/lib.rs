//! Domain-driven configuration management for Toolhub
//!
//! Configuration is split by functional domain (logging, plugins, locale)
//! plus a flat string-keyed settings store that capabilities read through
//! their execution context. Every domain carries defaults, is validated,
//! and can be overridden from `TOOLHUB_`-prefixed environment variables.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    locale::LocaleConfig, logging::LoggingConfig, plugins::PluginsConfig, ToolhubConfig,
};
