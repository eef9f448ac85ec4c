//! Capability system for Toolhub
//!
//! Capabilities are independently written admin tools. The host builds one
//! [`ExecutionContext`], enumerates candidates from a [`CapabilitySource`],
//! and a [`Bootstrap`] run initializes each one and registers the successes
//! in a shared [`CapabilityRegistry`].

pub mod bootstrap;
pub mod context;
pub mod core;
pub mod error;
pub mod registry;
pub mod source;
pub mod text;
pub mod types;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types
pub use bootstrap::{Bootstrap, BootstrapFailure, BootstrapReport};
pub use context::{
    ExecutionContext, HostContext, HostContextBuilder, LogLevel, LogRecord, LogSink, MemorySink, SinkError,
    TracingSink,
};
pub use core::{Capability, CapabilityDescriptor, Cleanup};
pub use error::{PluginError, PluginResult};
pub use registry::{CapabilityRegistry, CapabilitySummary, RegistryStats};
pub use source::{
    CapabilityFactory, CapabilityRegistration, CapabilitySource, ChainedCapabilitySource, InventoryCapabilitySource,
    StaticCapabilitySource,
};
pub use text::TextCatalog;
pub use types::{Category, CapabilityVersion};
pub use view::{Action, FieldKind, Item, Panel, Section, StatusLevel, Toolbar};

/// Capability registration macros
pub mod macros {
    pub use inventory;

    /// Register a capability for link-time discovery by
    /// [`InventoryCapabilitySource`](crate::InventoryCapabilitySource)
    ///
    /// # Example
    /// ```rust,ignore
    /// use toolhub_plugin::register_capability;
    ///
    /// register_capability!(DiskUsageCapability::new());
    /// ```
    #[macro_export]
    macro_rules! register_capability {
        ($capability:expr) => {
            const _: () = {
                fn __toolhub_capability_factory() -> ::std::boxed::Box<dyn $crate::Capability> {
                    ::std::boxed::Box::new($capability)
                }

                $crate::macros::inventory::submit! {
                    $crate::CapabilityRegistration::new(__toolhub_capability_factory)
                }
            };
        };
    }
}
