//! Startup sequence: enumerate, initialize, register

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

use crate::context::{ExecutionContext, LogLevel};
use crate::core::Capability;
use crate::error::{PluginError, PluginResult};
use crate::registry::CapabilityRegistry;
use crate::source::CapabilitySource;

/// One candidate that did not make it into the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapFailure {
    pub id: String,
    pub name: String,
    pub error: String,
}

/// Outcome of a bootstrap run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub run_id: Uuid,
    pub source_type: String,
    /// Ids registered, in enumeration order
    pub registered: Vec<String>,
    pub failures: Vec<BootstrapFailure>,
    /// Ids skipped because configuration disabled them
    pub disabled: Vec<String>,
    /// Set when the source could not enumerate at all
    pub source_error: Option<String>,
}

impl BootstrapReport {
    fn new(run_id: Uuid, source_type: &str) -> Self {
        Self {
            run_id,
            source_type: source_type.to_string(),
            registered: Vec::new(),
            failures: Vec::new(),
            disabled: Vec::new(),
            source_error: None,
        }
    }

    /// True when nothing failed, including the source itself
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.source_error.is_none()
    }
}

/// Brings capabilities from a source into a registry against one shared
/// context.
///
/// A failing candidate is logged and skipped; a failing source leaves the
/// registry untouched. `run` never returns an error and never panics on
/// behalf of a capability.
pub struct Bootstrap {
    registry: Arc<CapabilityRegistry>,
    context: Arc<dyn ExecutionContext>,
    disabled: HashSet<String>,
}

impl Bootstrap {
    pub fn new(registry: Arc<CapabilityRegistry>, context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            registry,
            context,
            disabled: HashSet::new(),
        }
    }

    /// Skip candidates with these ids
    pub fn with_disabled<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn run(&self, source: &dyn CapabilitySource) -> BootstrapReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            target: "toolhub::bootstrap",
            "bootstrap",
            run_id = %run_id,
            source = source.source_type()
        );
        let _guard = span.enter();

        let mut report = BootstrapReport::new(run_id, source.source_type());

        let candidates = match catch_unwind(AssertUnwindSafe(|| source.enumerate())) {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                self.source_failed(&mut report, e);
                return report;
            }
            Err(payload) => {
                let e = PluginError::source_failed(
                    source.source_type(),
                    crate::error::panic_message(payload.as_ref()),
                );
                self.source_failed(&mut report, e);
                return report;
            }
        };

        tracing::debug!(target: "toolhub::bootstrap", candidates = candidates.len(), "Enumerated capabilities");

        for candidate in candidates {
            let id = candidate.descriptor().id.clone();
            let name = candidate.descriptor().name.clone();

            if self.disabled.contains(&id) {
                self.context.log(
                    LogLevel::Info,
                    &format!("Capability '{}' ({}) is disabled, skipping", name, id),
                    None,
                );
                report.disabled.push(id);
                continue;
            }

            match self.bring_up(candidate) {
                Ok(()) => {
                    self.context.log(
                        LogLevel::Info,
                        &format!("Registered capability '{}' ({})", name, id),
                        None,
                    );
                    report.registered.push(id);
                }
                Err(e) => {
                    self.context.log(
                        LogLevel::Error,
                        &format!("Failed to load capability '{}' ({})", name, id),
                        Some(&e),
                    );
                    report.failures.push(BootstrapFailure {
                        id,
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.context.log(
            LogLevel::Info,
            &format!("Registered {} capabilities", report.registered.len()),
            None,
        );

        report
    }

    fn bring_up(&self, mut candidate: Box<dyn Capability>) -> PluginResult<()> {
        // Rejected before initialize, so nothing needs cleaning up
        candidate.descriptor().validate()?;

        let id = candidate.descriptor().id.clone();
        let context = self.context.clone();

        catch_unwind(AssertUnwindSafe(|| candidate.initialize(context)))
            .map_err(|payload| PluginError::from_panic(id, payload))??;

        self.registry.register(Arc::from(candidate))
    }

    fn source_failed(&self, report: &mut BootstrapReport, error: PluginError) {
        self.context.log(
            LogLevel::Error,
            &format!("Capability discovery via '{}' failed", report.source_type),
            Some(&error),
        );
        report.source_error = Some(error.to_string());
    }
}
