//! Shared capability doubles for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use toolhub_plugin::{
    Capability, CapabilityDescriptor, CapabilityVersion, Category, Cleanup, ExecutionContext, HostContext,
    MemorySink, Panel, PluginError, PluginResult, Toolbar,
};

pub struct Probe {
    descriptor: CapabilityDescriptor,
    fail_with: Option<String>,
    available: AtomicBool,
    cleanups: Arc<AtomicUsize>,
}

impl Probe {
    pub fn new(id: &str, category: Category) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                id,
                format!("Probe {}", id),
                CapabilityVersion::new(0, 1, 0),
                "Integration probe",
                "Toolhub Tests",
                category,
            ),
            fail_with: None,
            available: AtomicBool::new(false),
            cleanups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_with = Some(reason.to_string());
        self
    }

    /// Mark available without going through bootstrap
    pub fn ready(self) -> Self {
        self.available.store(true, Ordering::SeqCst);
        self
    }

    pub fn cleanups(&self) -> Arc<AtomicUsize> {
        self.cleanups.clone()
    }
}

impl Capability for Probe {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, _context: Arc<dyn ExecutionContext>) -> PluginResult<()> {
        if let Some(ref reason) = self.fail_with {
            return Err(PluginError::initialization_failed(self.descriptor.id.clone(), reason.clone()));
        }
        self.available.store(true, Ordering::SeqCst);
        Ok(())
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
    }

    fn toolbar(&self) -> Toolbar {
        Toolbar::None
    }
}

pub fn ready(id: &str, category: Category) -> Arc<dyn Capability> {
    Arc::new(Probe::new(id, category).ready())
}

pub fn recording_context() -> (Arc<dyn ExecutionContext>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let context = HostContext::builder().with_sink(sink.clone()).build();
    (Arc::new(context), sink)
}
