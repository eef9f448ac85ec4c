//! Execution context handed to capabilities, and the host implementation

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

use crate::text::TextCatalog;

/// Severity of a capability log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", level)
    }
}

/// The only view of the host a capability gets.
///
/// None of these calls fail: text lookups fall back to the key, logging
/// swallows sink failures, and configuration misses are `None`.
pub trait ExecutionContext: Send + Sync {
    /// Localized text for `key` with `{n}` placeholders filled from `args`
    fn get_text(&self, key: &str, args: &[&str]) -> String;

    /// Emit a log entry, optionally with the error that caused it
    fn log(&self, level: LogLevel, message: &str, cause: Option<&(dyn StdError + 'static)>);

    /// Flat configuration value for `key`
    fn get_config_value(&self, key: &str) -> Option<String>;
}

/// A log entry as delivered to a [`LogSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Rendered cause chain, outermost first, joined with `": "`
    pub cause: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, cause: Option<&(dyn StdError + 'static)>) -> Self {
        Self {
            level,
            message: message.into(),
            cause: cause.map(render_cause_chain),
            timestamp: Utc::now(),
        }
    }
}

/// Failure reported by a sink; never reaches the capability
#[derive(Debug, thiserror::Error)]
#[error("log sink unavailable: {0}")]
pub struct SinkError(pub String);

/// Destination for capability log entries
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Forwards records to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let cause = record.cause.as_deref().unwrap_or_default();
        match record.level {
            LogLevel::Debug => tracing::debug!(target: "toolhub::capability", cause, "{}", record.message),
            LogLevel::Info => tracing::info!(target: "toolhub::capability", cause, "{}", record.message),
            LogLevel::Warn => tracing::warn!(target: "toolhub::capability", cause, "{}", record.message),
            LogLevel::Error => tracing::error!(target: "toolhub::capability", cause, "{}", record.message),
        }
        Ok(())
    }
}

/// Keeps records in memory, optionally forwarding them to another sink
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    forward: Option<Arc<dyn LogSink>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records and also hand them to `sink`
    pub fn forwarding_to(sink: Arc<dyn LogSink>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            forward: Some(sink),
        }
    }

    /// Snapshot of every record so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Records at `level`
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        match self.forward {
            Some(ref sink) => sink.emit(record),
            None => Ok(()),
        }
    }
}

/// Host-side [`ExecutionContext`] backed by a text catalog, flat settings
/// and a log sink
pub struct HostContext {
    session_id: Uuid,
    locale: String,
    catalog: TextCatalog,
    settings: BTreeMap<String, String>,
    sink: Arc<dyn LogSink>,
}

impl HostContext {
    pub fn builder() -> HostContextBuilder {
        HostContextBuilder::new()
    }

    /// Identifier attached to every record this context forwards to tracing
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl ExecutionContext for HostContext {
    fn get_text(&self, key: &str, args: &[&str]) -> String {
        self.catalog.text(&self.locale, key, args)
    }

    fn log(&self, level: LogLevel, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        let record = LogRecord::new(level, message, cause);

        match catch_unwind(AssertUnwindSafe(|| self.sink.emit(&record))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(target: "toolhub::context", session = %self.session_id, error = %e, "Dropped log record");
            }
            Err(_) => {
                tracing::debug!(target: "toolhub::context", session = %self.session_id, "Log sink panicked, record dropped");
            }
        }
    }

    fn get_config_value(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("session_id", &self.session_id)
            .field("locale", &self.locale)
            .field("settings", &self.settings.len())
            .finish()
    }
}

/// Builder for [`HostContext`]
pub struct HostContextBuilder {
    locale: Option<String>,
    catalog: TextCatalog,
    settings: BTreeMap<String, String>,
    sink: Arc<dyn LogSink>,
}

impl Default for HostContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContextBuilder {
    pub fn new() -> Self {
        Self {
            locale: None,
            catalog: TextCatalog::default(),
            settings: BTreeMap::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Start from a loaded configuration: host strings, any message bundles
    /// under `locale.messages_dir`, the active locale and the flat settings.
    ///
    /// Bundles that fail to load are logged and left out; lookups then fall
    /// back to the embedded strings or the key itself.
    pub fn from_config(config: &toolhub_config::ToolhubConfig) -> Self {
        let default_locale = &config.locale.default_locale;
        let mut catalog = TextCatalog::with_host_defaults(default_locale).unwrap_or_else(|e| {
            tracing::warn!(target: "toolhub::context", error = %e, "Embedded host messages unavailable");
            TextCatalog::new(default_locale)
        });

        if let Some(ref dir) = config.locale.messages_dir {
            if let Err(e) = catalog.load_dir(dir) {
                tracing::warn!(target: "toolhub::context", error = %e, "Message bundles not loaded");
            }
        }

        Self::new()
            .with_catalog(catalog)
            .with_locale(config.locale.active_locale())
            .with_settings(config.settings.clone())
    }

    pub fn with_catalog(mut self, catalog: TextCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Mutable access for adding bundles after construction
    pub fn catalog_mut(&mut self) -> &mut TextCatalog {
        &mut self.catalog
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_settings(mut self, settings: BTreeMap<String, String>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> HostContext {
        let locale = self
            .locale
            .unwrap_or_else(|| self.catalog.default_locale().to_string());

        HostContext {
            session_id: Uuid::new_v4(),
            locale,
            catalog: self.catalog,
            settings: self.settings,
            sink: self.sink,
        }
    }
}

fn render_cause_chain(cause: &(dyn StdError + 'static)) -> String {
    let mut rendered = cause.to_string();
    let mut source = cause.source();
    while let Some(inner) = source {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        source = inner.source();
    }
    rendered
}
