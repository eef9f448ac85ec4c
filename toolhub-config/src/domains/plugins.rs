//! Capability enablement configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which discovered capabilities the host should bring up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Capability ids skipped during bootstrap
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl PluginsConfig {
    /// Whether the capability with `id` is disabled
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.iter().any(|disabled| disabled == id)
    }
}

impl Validatable for PluginsConfig {
    fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for id in &self.disabled {
            validate_required_string(id, "disabled entry", self.domain_name())?;
            if !seen.insert(id.as_str()) {
                return Err(self.validation_error(format!("capability '{}' is listed twice", id)));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "plugins"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_disabled() {
        let config = PluginsConfig {
            disabled: vec!["toolhub.diagnostics".to_string()],
        };
        assert!(config.is_disabled("toolhub.diagnostics"));
        assert!(!config.is_disabled("toolhub.server-config"));
    }

    #[test]
    fn test_duplicate_disabled_rejected() {
        let config = PluginsConfig {
            disabled: vec!["a".to_string(), "a".to_string()],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_disabled_rejected() {
        let config = PluginsConfig {
            disabled: vec![String::new()],
        };
        assert!(config.validate().is_err());
    }
}
