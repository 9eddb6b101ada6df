//! Explicitly injected capabilities action code may call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::SharedContext;
use crate::errors::CapabilityError;

/// One callable handed to action code by the orchestrator.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Invoke with positional arguments and the run's shared context.
    async fn invoke(
        &self,
        args: &[Value],
        ctx: &mut SharedContext,
    ) -> Result<Value, CapabilityError>;
}

/// Named capability map: the complete set of effects reachable from action
/// code. Nothing outside these bindings is callable.
#[derive(Clone, Default)]
pub struct Bindings {
    map: HashMap<String, Arc<dyn Capability>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn bind(mut self, name: impl Into<String>, capability: Arc<dyn Capability>) -> Self {
        self.map.insert(name.into(), capability);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        self.map.get(name)
    }

    /// Sorted capability names, e.g. for listing in a prompt.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
