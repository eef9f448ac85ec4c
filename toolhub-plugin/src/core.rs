//! Core capability trait and descriptor definitions

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::{PluginError, PluginResult};
use crate::types::{Category, CapabilityVersion};
use crate::view::{Panel, Toolbar};

/// Immutable metadata identifying one capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Unique identifier, used as the registry key
    pub id: String,
    /// Display name
    pub name: String,
    /// Capability version
    pub version: CapabilityVersion,
    /// Short description
    pub description: String,
    /// Author or team
    pub author: String,
    /// Listing group
    pub category: Category,
}

impl CapabilityDescriptor {
    /// Create a new capability descriptor
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: CapabilityVersion,
        description: impl Into<String>,
        author: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            description: description.into(),
            author: author.into(),
            category,
        }
    }

    /// Validate the descriptor
    pub fn validate(&self) -> PluginResult<()> {
        if self.id.trim().is_empty() {
            return Err(PluginError::InvalidDescriptor {
                reason: format!("capability '{}' has an empty id", self.name),
            });
        }

        Ok(())
    }
}

/// What a capability released when it was cleaned up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// Nothing was held
    NotNeeded,
    /// Resources were released
    Released,
}

/// Contract every capability implements.
///
/// `initialize` runs once, before registration, on the bootstrap thread.
/// Everything else may be called from any thread once the capability is
/// registered, so mutable state lives behind interior mutability.
pub trait Capability: Send + Sync {
    /// Descriptor owned by this instance
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Prepare the capability against the shared host context
    fn initialize(&mut self, context: Arc<dyn ExecutionContext>) -> PluginResult<()>;

    /// True only after a successful `initialize` and before `cleanup`
    fn is_available(&self) -> bool;

    /// Release held resources; called once when unregistered
    fn cleanup(&self) -> Cleanup;

    /// Primary content shown when the capability is selected
    fn content(&self) -> Panel;

    /// Toolbar shown above the content
    fn toolbar(&self) -> Toolbar;
}

impl std::fmt::Debug for dyn Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("id", &self.descriptor().id)
            .field("available", &self.is_available())
            .finish()
    }
}
