//! Localization configuration

use crate::error::ConfigResult;
use crate::validation::{validate_locale_tag, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Localization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when a key is missing from the active locale and its family
    #[serde(default = "crate::domains::utils::default_locale")]
    pub default_locale: String,

    /// Active locale; falls back to `default_locale` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Directory holding additional `messages_<locale>.yaml` bundles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_dir: Option<PathBuf>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: crate::domains::utils::default_locale(),
            locale: None,
            messages_dir: None,
        }
    }
}

impl LocaleConfig {
    /// The locale text lookups start from
    pub fn active_locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(&self.default_locale)
    }
}

impl Validatable for LocaleConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_locale_tag(&self.default_locale, "default_locale", self.domain_name())?;

        if let Some(ref locale) = self.locale {
            validate_locale_tag(locale, "locale", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "locale"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_locale_defaults() {
        let mut config = LocaleConfig::default();
        assert_eq!(config.active_locale(), "en");

        config.locale = Some("de-CH".to_string());
        assert_eq!(config.active_locale(), "de-CH");
    }

    #[test]
    fn test_invalid_locale_rejected() {
        let config = LocaleConfig {
            locale: Some("not a locale".to_string()),
            ..LocaleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
