//! Localized text catalog with locale fallback

use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{PluginError, PluginResult};

/// Host strings shipped with the binary
const EMBEDDED_EN_MESSAGES: &str = include_str!("../resources/messages_en.yaml");

const BUNDLE_PREFIX: &str = "messages_";

/// Message templates keyed by locale, then by message key.
///
/// Lookup for `de-CH` tries `de-ch`, then `de`, then the default locale and
/// its language family. A key missing everywhere resolves to itself.
#[derive(Debug, Clone)]
pub struct TextCatalog {
    default_locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl Default for TextCatalog {
    fn default() -> Self {
        Self::new("en")
    }
}

impl TextCatalog {
    /// Create an empty catalog
    pub fn new(default_locale: &str) -> Self {
        Self {
            default_locale: normalize_locale(default_locale),
            bundles: HashMap::new(),
        }
    }

    /// Create a catalog preloaded with the embedded English host strings
    pub fn with_host_defaults(default_locale: &str) -> PluginResult<Self> {
        let mut catalog = Self::new(default_locale);
        catalog.load_bundle_str("en", EMBEDDED_EN_MESSAGES)?;
        Ok(catalog)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Merge templates into a locale's bundle, later entries winning
    pub fn add_bundle<I, K, V>(&mut self, locale: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.bundles
            .entry(normalize_locale(locale))
            .or_default()
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Merge a flat YAML map of `key: template` into a locale's bundle
    pub fn load_bundle_str(&mut self, locale: &str, yaml: &str) -> PluginResult<()> {
        let messages: HashMap<String, String> = if yaml.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yaml::from_str(yaml)?
        };
        self.add_bundle(locale, messages);
        Ok(())
    }

    /// Load every `messages_<locale>.yaml` file directly inside `dir`.
    ///
    /// Only an unreadable `dir` is an error. Bundles that cannot be read or
    /// parsed are logged and skipped. Returns the number of bundles loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> PluginResult<usize> {
        let dir = dir.as_ref();
        let mut loaded = 0;

        for entry in WalkDir::new(dir).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(PluginError::BundleDirUnreadable {
                        path: dir.display().to_string(),
                        reason: e
                            .io_error()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| e.to_string()),
                    });
                }
                Err(e) => {
                    tracing::warn!(target: "toolhub::text", error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(locale) = bundle_locale(entry.path()) else {
                continue;
            };

            let parsed = std::fs::read_to_string(entry.path())
                .map_err(PluginError::from)
                .and_then(|content| self.load_bundle_str(&locale, &content));
            if let Err(e) = parsed {
                tracing::warn!(
                    target: "toolhub::text",
                    file = ?entry.path(),
                    error = %e,
                    "Skipping message bundle"
                );
                continue;
            }
            loaded += 1;

            tracing::debug!(
                target: "toolhub::text",
                locale = %locale,
                file = ?entry.path(),
                "Message bundle loaded"
            );
        }

        Ok(loaded)
    }

    /// Find the raw template for `key`, walking the fallback chain
    pub fn resolve(&self, locale: &str, key: &str) -> Option<&str> {
        self.fallback_chain(locale)
            .into_iter()
            .find_map(|candidate| self.bundles.get(&candidate)?.get(key))
            .map(String::as_str)
    }

    /// Resolve and interpolate `{0}`, `{1}`, ... with `args`; missing keys
    /// come back unchanged
    pub fn text(&self, locale: &str, key: &str, args: &[&str]) -> String {
        match self.resolve(locale, key) {
            Some(template) => format_positional(template, args),
            None => key.to_string(),
        }
    }

    fn fallback_chain(&self, locale: &str) -> Vec<String> {
        let mut chain = Vec::with_capacity(4);
        for tag in [normalize_locale(locale), self.default_locale.clone()] {
            let family = language_family(&tag).to_string();
            for candidate in [tag, family] {
                if !candidate.is_empty() && !chain.contains(&candidate) {
                    chain.push(candidate);
                }
            }
        }
        chain
    }
}

/// Replace `{n}` placeholders with `args[n]`.
///
/// Placeholders without a matching argument, and braces that do not form a
/// placeholder, are kept verbatim.
pub fn format_positional(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            args.get(index).map(|arg| (arg, close))
        });

        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_lowercase()
}

fn language_family(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

fn bundle_locale(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if extension != "yaml" && extension != "yml" {
        return None;
    }

    let stem = path.file_stem()?.to_str()?;
    let locale = stem.strip_prefix(BUNDLE_PREFIX)?;
    (!locale.is_empty()).then(|| locale.to_string())
}
