//! Test doubles for capability hosts

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::context::{ExecutionContext, HostContext, LogLevel, MemorySink};
use crate::core::{Capability, CapabilityDescriptor, Cleanup};
use crate::error::{PluginError, PluginResult};
use crate::types::{Category, CapabilityVersion};
use crate::view::{Item, Panel, Section, Toolbar};

#[derive(Debug, Clone)]
enum InitBehavior {
    Succeed,
    Fail(String),
    Panic(String),
}

/// Configurable capability for exercising the registry and bootstrap
#[derive(Debug)]
pub struct TestCapability {
    descriptor: CapabilityDescriptor,
    init: InitBehavior,
    available: AtomicBool,
    cleanups: Arc<AtomicUsize>,
}

impl TestCapability {
    /// Version 1.0.0 capability whose display name is its id
    pub fn new(id: &str, category: Category) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                id,
                id,
                CapabilityVersion::new(1, 0, 0),
                "Test capability",
                "Toolhub Tests",
                category,
            ),
            init: InitBehavior::Succeed,
            available: AtomicBool::new(false),
            cleanups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Same as [`TestCapability::new`] but already available, for tests
    /// that register without a bootstrap
    pub fn ready(id: &str, category: Category) -> Self {
        let capability = Self::new(id, category);
        capability.available.store(true, Ordering::SeqCst);
        capability
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.descriptor.name = name.to_string();
        self
    }

    /// `initialize` returns an error with `reason`
    pub fn failing(mut self, reason: &str) -> Self {
        self.init = InitBehavior::Fail(reason.to_string());
        self
    }

    /// `initialize` panics with `message`
    pub fn panicking(mut self, message: &str) -> Self {
        self.init = InitBehavior::Panic(message.to_string());
        self
    }

    /// Shared counter of `cleanup` calls, readable after the capability has
    /// been handed to a registry
    pub fn cleanup_counter(&self) -> Arc<AtomicUsize> {
        self.cleanups.clone()
    }
}

impl Capability for TestCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, context: Arc<dyn ExecutionContext>) -> PluginResult<()> {
        match self.init {
            InitBehavior::Succeed => {
                context.log(LogLevel::Debug, &format!("{} ready", self.descriptor.id), None);
                self.available.store(true, Ordering::SeqCst);
                Ok(())
            }
            InitBehavior::Fail(ref reason) => Err(PluginError::initialization_failed(
                self.descriptor.id.clone(),
                reason.clone(),
            )),
            InitBehavior::Panic(ref message) => panic!("{}", message),
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn cleanup(&self) -> Cleanup {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        self.available.store(false, Ordering::SeqCst);
        Cleanup::Released
    }

    fn content(&self) -> Panel {
        Panel::new(self.descriptor.name.clone())
            .with_section(Section::default().with_item(Item::text(self.descriptor.description.clone())))
    }

    fn toolbar(&self) -> Toolbar {
        Toolbar::None
    }
}

/// Context with no catalog or settings whose log records go nowhere
pub fn silent_context() -> Arc<dyn ExecutionContext> {
    Arc::new(HostContext::builder().with_sink(Arc::new(MemorySink::new())).build())
}

/// Context plus the sink capturing its log records
pub fn recording_context() -> (Arc<dyn ExecutionContext>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let context = HostContext::builder().with_sink(sink.clone()).build();
    (Arc::new(context), sink)
}
