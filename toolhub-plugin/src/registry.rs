//! Capability registry keyed by descriptor id

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Capability, CapabilityDescriptor, Cleanup};
use crate::error::PluginResult;
use crate::types::Category;

/// Listing entry for a registered capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySummary {
    /// Capability descriptor
    pub descriptor: CapabilityDescriptor,
    /// Availability at the time of the snapshot
    pub available: bool,
}

impl CapabilitySummary {
    fn of(capability: &dyn Capability) -> Self {
        Self {
            descriptor: capability.descriptor().clone(),
            available: capability.is_available(),
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Successful `register` calls
    pub registrations: u64,
    /// Registrations that replaced an entry with the same id
    pub replacements: u64,
    /// `unregister` calls that removed an entry
    pub unregistrations: u64,
}

#[derive(Default)]
struct RegistryInner {
    capabilities: HashMap<String, Arc<dyn Capability>>,
    stats: RegistryStats,
}

/// Thread-safe directory of initialized capabilities.
///
/// Each call is atomic on its own; a `get` followed by `register` from the
/// same caller is not. A second registration under an existing id replaces
/// the first without cleaning it up.
#[derive(Default)]
pub struct CapabilityRegistry {
    inner: RwLock<RegistryInner>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a capability under its descriptor id
    pub fn register(&self, capability: Arc<dyn Capability>) -> PluginResult<()> {
        capability.descriptor().validate()?;
        let id = capability.descriptor().id.clone();

        let replaced = {
            let mut inner = self.inner.write();
            inner.stats.registrations += 1;
            let replaced = inner.capabilities.insert(id.clone(), capability);
            if replaced.is_some() {
                inner.stats.replacements += 1;
            }
            replaced
        };

        if let Some(previous) = replaced {
            tracing::debug!(
                target: "toolhub::registry",
                capability_id = %id,
                previous_version = %previous.descriptor().version,
                "Capability replaced"
            );
        } else {
            tracing::debug!(target: "toolhub::registry", capability_id = %id, "Capability registered");
        }

        Ok(())
    }

    /// Remove a capability and run its cleanup.
    ///
    /// Returns `false` when nothing was registered under `id`. Cleanup runs
    /// after the entry is gone and the lock is released.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.capabilities.remove(id);
            if removed.is_some() {
                inner.stats.unregistrations += 1;
            }
            removed
        };

        let Some(capability) = removed else {
            return false;
        };

        let cleanup = capability.cleanup();
        tracing::debug!(
            target: "toolhub::registry",
            capability_id = %id,
            released = matches!(cleanup, Cleanup::Released),
            "Capability unregistered"
        );

        true
    }

    /// Capability registered under `id`
    pub fn get(&self, id: &str) -> Option<Arc<dyn Capability>> {
        self.inner.read().capabilities.get(id).cloned()
    }

    /// Snapshot of every registered capability, in no particular order
    pub fn get_all(&self) -> Vec<Arc<dyn Capability>> {
        self.inner.read().capabilities.values().cloned().collect()
    }

    /// Registered capabilities in `category`
    pub fn get_by_category(&self, category: Category) -> Vec<Arc<dyn Capability>> {
        self.inner
            .read()
            .capabilities
            .values()
            .filter(|capability| capability.descriptor().category == category)
            .cloned()
            .collect()
    }

    /// Registered capabilities that report themselves available
    pub fn available(&self) -> Vec<Arc<dyn Capability>> {
        self.get_all()
            .into_iter()
            .filter(|capability| capability.is_available())
            .collect()
    }

    /// Listing sorted by display name, then id
    pub fn summaries(&self) -> Vec<CapabilitySummary> {
        let mut summaries: Vec<_> = self
            .get_all()
            .iter()
            .map(|capability| CapabilitySummary::of(capability.as_ref()))
            .collect();

        summaries.sort_by(|a, b| {
            a.descriptor
                .name
                .cmp(&b.descriptor.name)
                .then_with(|| a.descriptor.id.cmp(&b.descriptor.id))
        });
        summaries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().capabilities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().capabilities.is_empty()
    }

    /// Registry statistics
    pub fn stats(&self) -> RegistryStats {
        self.inner.read().stats.clone()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        let mut ids: Vec<_> = inner.capabilities.keys().collect();
        ids.sort();
        f.debug_struct("CapabilityRegistry")
            .field("capabilities", &ids)
            .field("stats", &inner.stats)
            .finish()
    }
}
