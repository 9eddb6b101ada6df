//! Cache coordination: key derivation, validated lookup and the run-scoped
//! temporary tier.

use std::sync::Arc;

use blake3::Hasher;
use dashmap::DashMap;
use pilot_core_types::StepRecord;
use serde::Serialize;
use serde_json::Value;
use snapshot_hash::{HashRegistry, SnapshotHashSet};
use tracing::debug;

use crate::errors::CacheError;
use crate::store::{CacheEntry, CacheStore};

/// Canonical material the fingerprint is derived from. Field order is fixed
/// so two runs with identical goal and ordered history digest identically.
#[derive(Serialize)]
struct KeyMaterial<'a> {
    goal: &'a str,
    steps: &'a [StepRecord],
}

/// Mediates between the run loop and the cache store.
pub struct CacheCoordinator {
    store: Arc<dyn CacheStore>,
    registry: Arc<HashRegistry>,
    enabled: bool,
    temporary: DashMap<String, Vec<CacheEntry>>,
}

impl CacheCoordinator {
    pub fn new(store: Arc<dyn CacheStore>, registry: Arc<HashRegistry>) -> Self {
        Self {
            store,
            registry,
            enabled: true,
            temporary: DashMap::new(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Callers check this before any lookup or record call.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Deterministic fingerprint of (goal, ordered step history).
    ///
    /// Used only as a lookup key, never displayed.
    pub fn generate_cache_key(&self, goal: &str, history: &[StepRecord]) -> String {
        let material = KeyMaterial {
            goal,
            steps: history,
        };
        let json = serde_json::to_vec(&material).expect("key material is plain data");
        let mut hasher = Hasher::new();
        hasher.update(&json);
        hasher.finalize().to_hex().to_string()
    }

    /// First stored candidate whose snapshot hashes still match the current
    /// screen. Stale candidates (fingerprint hit, snapshot mismatch) are
    /// skipped as misses and left in place.
    pub async fn find_matching(
        &self,
        fingerprint: &str,
        current: &SnapshotHashSet,
    ) -> Result<Option<Value>, CacheError> {
        let candidates = self.store.get_candidates(fingerprint).await?;
        let total = candidates.len();
        for candidate in candidates {
            if self.registry.compare_snapshot(&candidate.hashes, current) {
                return Ok(Some(candidate.value));
            }
        }
        if total > 0 {
            debug!(fingerprint, candidates = total, "all cache candidates stale");
        }
        Ok(None)
    }

    /// Record a freshly computed plan into the run-scoped temporary tier.
    pub fn record(&self, fingerprint: &str, value: Value, hashes: SnapshotHashSet) {
        let entry = CacheEntry {
            fingerprint: fingerprint.to_string(),
            value,
            hashes,
        };
        self.temporary
            .entry(fingerprint.to_string())
            .or_default()
            .push(entry);
    }

    /// Hand the temporary tier's entries to the host for promotion into the
    /// persistent store, emptying the tier.
    pub fn drain_temporary(&self) -> Vec<CacheEntry> {
        let keys: Vec<String> = self.temporary.iter().map(|e| e.key().clone()).collect();
        let mut drained = Vec::new();
        for key in keys {
            if let Some((_, entries)) = self.temporary.remove(&key) {
                drained.extend(entries);
            }
        }
        drained
    }
}
