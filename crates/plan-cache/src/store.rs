//! Narrow boundary to the external cache store.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapshot_hash::SnapshotHashSet;

use crate::errors::CacheError;

/// One cached plan payload keyed by fingerprint.
///
/// Entries are never mutated after being added, only appended alongside
/// other candidates for the same fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Deterministic digest of (goal, step history).
    pub fingerprint: String,
    /// Opaque plan payload; no schema imposed beyond being serializable.
    pub value: Value,
    /// Hashes of the screen the payload was computed on.
    pub hashes: SnapshotHashSet,
}

/// Persistence boundary for cache entries.
///
/// Promotion of run-scoped entries into this store is the holder's
/// responsibility, not the coordinator's.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Add one candidate under its fingerprint.
    async fn put(
        &self,
        fingerprint: &str,
        value: Value,
        hashes: SnapshotHashSet,
    ) -> Result<(), CacheError>;

    /// All candidates stored under a fingerprint, zero or more.
    async fn get_candidates(&self, fingerprint: &str) -> Result<Vec<CacheEntry>, CacheError>;
}

/// Process-local store backed by a concurrent map. Useful for tests and for
/// hosts that handle persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, Vec<CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn put(
        &self,
        fingerprint: &str,
        value: Value,
        hashes: SnapshotHashSet,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            fingerprint: fingerprint.to_string(),
            value,
            hashes,
        };
        self.entries
            .entry(fingerprint.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn get_candidates(&self, fingerprint: &str) -> Result<Vec<CacheEntry>, CacheError> {
        Ok(self
            .entries
            .get(fingerprint)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_candidates_accumulate_per_fingerprint() {
        let store = MemoryCacheStore::new();
        store
            .put("fp-1", json!({"plan": 1}), SnapshotHashSet::new())
            .await
            .unwrap();
        store
            .put("fp-1", json!({"plan": 2}), SnapshotHashSet::new())
            .await
            .unwrap();
        store
            .put("fp-2", json!({"plan": 3}), SnapshotHashSet::new())
            .await
            .unwrap();

        let candidates = store.get_candidates("fp-1").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].value, json!({"plan": 1}));

        assert!(store.get_candidates("fp-3").await.unwrap().is_empty());
        assert_eq!(store.len(), 3);
    }
}
