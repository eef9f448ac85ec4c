//! Capability sources: where bootstrap gets its uninitialized candidates

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::core::Capability;
use crate::error::{panic_message, PluginError, PluginResult};

/// Constructor for one default-configured, uninitialized capability
pub type CapabilityFactory = fn() -> Box<dyn Capability>;

/// Produces the candidates a bootstrap run initializes.
///
/// Each call returns fresh instances; order carries no meaning.
pub trait CapabilitySource: Send + Sync {
    /// Construct every candidate
    fn enumerate(&self) -> PluginResult<Vec<Box<dyn Capability>>>;

    /// Short name used in logs and errors
    fn source_type(&self) -> &'static str;
}

/// Link-time registration entry collected by [`InventoryCapabilitySource`].
///
/// Submitted through [`register_capability!`](crate::register_capability).
pub struct CapabilityRegistration {
    create: CapabilityFactory,
}

impl CapabilityRegistration {
    pub const fn new(create: CapabilityFactory) -> Self {
        Self { create }
    }
}

inventory::collect!(CapabilityRegistration);

/// Explicit table of capability factories
#[derive(Default, Clone)]
pub struct StaticCapabilitySource {
    factories: Vec<CapabilityFactory>,
}

impl StaticCapabilitySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability factory
    pub fn add_factory(&mut self, factory: CapabilityFactory) {
        self.factories.push(factory);
    }

    pub fn with_factory(mut self, factory: CapabilityFactory) -> Self {
        self.add_factory(factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl CapabilitySource for StaticCapabilitySource {
    fn enumerate(&self) -> PluginResult<Vec<Box<dyn Capability>>> {
        construct_all(self.source_type(), self.factories.iter().copied())
    }

    fn source_type(&self) -> &'static str {
        "static"
    }
}

/// Every capability submitted with `register_capability!` in the linked
/// binary
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryCapabilitySource;

impl InventoryCapabilitySource {
    pub fn new() -> Self {
        Self
    }

    /// Number of submitted registrations
    pub fn len(&self) -> usize {
        inventory::iter::<CapabilityRegistration>.into_iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CapabilitySource for InventoryCapabilitySource {
    fn enumerate(&self) -> PluginResult<Vec<Box<dyn Capability>>> {
        construct_all(
            self.source_type(),
            inventory::iter::<CapabilityRegistration>
                .into_iter()
                .map(|registration| registration.create),
        )
    }

    fn source_type(&self) -> &'static str {
        "inventory"
    }
}

/// Concatenation of several sources, in the order they were added.
///
/// Fails as a whole when any constituent fails.
#[derive(Default)]
pub struct ChainedCapabilitySource {
    sources: Vec<Box<dyn CapabilitySource>>,
}

impl ChainedCapabilitySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl CapabilitySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CapabilitySource for ChainedCapabilitySource {
    fn enumerate(&self) -> PluginResult<Vec<Box<dyn Capability>>> {
        let mut candidates = Vec::new();
        for source in &self.sources {
            candidates.extend(source.enumerate()?);
        }
        Ok(candidates)
    }

    fn source_type(&self) -> &'static str {
        "chained"
    }
}

/// Run each factory; a panicking factory fails the whole enumeration
fn construct_all(
    source_type: &'static str,
    factories: impl IntoIterator<Item = CapabilityFactory>,
) -> PluginResult<Vec<Box<dyn Capability>>> {
    factories
        .into_iter()
        .enumerate()
        .map(|(index, factory)| {
            catch_unwind(AssertUnwindSafe(factory)).map_err(|payload| {
                PluginError::source_failed(
                    source_type,
                    format!("factory #{} panicked: {}", index, panic_message(payload.as_ref())),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestCapability;
    use crate::types::Category;

    fn alpha() -> Box<dyn Capability> {
        Box::new(TestCapability::new("alpha", Category::Tool))
    }

    fn beta() -> Box<dyn Capability> {
        Box::new(TestCapability::new("beta", Category::Monitoring))
    }

    fn broken() -> Box<dyn Capability> {
        panic!("factory misconfigured")
    }

    struct FailingSource;

    impl CapabilitySource for FailingSource {
        fn enumerate(&self) -> PluginResult<Vec<Box<dyn Capability>>> {
            Err(PluginError::source_failed("failing", "manifest unreadable"))
        }

        fn source_type(&self) -> &'static str {
            "failing"
        }
    }

    fn ids(candidates: &[Box<dyn Capability>]) -> Vec<&str> {
        candidates.iter().map(|c| c.descriptor().id.as_str()).collect()
    }

    #[test]
    fn test_static_source_keeps_table_order() {
        let source = StaticCapabilitySource::new().with_factory(beta).with_factory(alpha);
        assert_eq!(source.len(), 2);

        let candidates = source.enumerate().unwrap();
        assert_eq!(ids(&candidates), vec!["beta", "alpha"]);
        assert!(candidates.iter().all(|c| !c.is_available()));
    }

    #[test]
    fn test_static_source_fresh_instances() {
        let source = StaticCapabilitySource::new().with_factory(alpha);
        let first = source.enumerate().unwrap();
        let second = source.enumerate().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_panicking_factory_fails_source() {
        let source = StaticCapabilitySource::new().with_factory(alpha).with_factory(broken);

        match source.enumerate() {
            Err(PluginError::SourceFailed { source_type, reason }) => {
                assert_eq!(source_type, "static");
                assert!(reason.contains("factory #1"));
                assert!(reason.contains("factory misconfigured"));
            }
            other => panic!("expected SourceFailed, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_chained_source() {
        let chained = ChainedCapabilitySource::new()
            .with_source(StaticCapabilitySource::new().with_factory(alpha))
            .with_source(StaticCapabilitySource::new().with_factory(beta));

        assert_eq!(chained.source_type(), "chained");
        assert_eq!(ids(&chained.enumerate().unwrap()), vec!["alpha", "beta"]);

        let failing = ChainedCapabilitySource::new()
            .with_source(StaticCapabilitySource::new().with_factory(alpha))
            .with_source(FailingSource);
        assert!(matches!(
            failing.enumerate(),
            Err(PluginError::SourceFailed { ref source_type, .. }) if source_type == "failing"
        ));
    }

    #[test]
    fn test_empty_sources() {
        assert!(StaticCapabilitySource::new().enumerate().unwrap().is_empty());
        assert!(ChainedCapabilitySource::new().enumerate().unwrap().is_empty());
    }
}
