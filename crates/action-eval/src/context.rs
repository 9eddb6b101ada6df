//! The shared mutable context carried across actions of one run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Explicit, versioned key-value store passed by reference into each action
/// execution.
///
/// Single-writer-at-a-time holds by construction: the run loop executes one
/// action at a time. There is no field-level access control; any action can
/// read or overwrite any key a previous action wrote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SharedContext {
    values: Map<String, Value>,
    version: u64,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write a value, bumping the context version.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
        self.version += 1;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Monotonic count of writes applied to this context.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}
