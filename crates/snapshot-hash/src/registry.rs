//! Fixed registry of hashing strategies.

use std::sync::Arc;

use pilot_core_types::CapturedSnapshot;
use tracing::debug;

use crate::algorithm::SnapshotHasher;
use crate::perceptual::BlockPerceptualHash;
use crate::set::SnapshotHashSet;
use crate::structural::StructuralHash;

/// Runs every registered strategy over a snapshot and compares hash sets.
///
/// The strategy list is fixed at construction; the two required algorithms
/// are known in advance, so there is no open-ended runtime registration.
#[derive(Clone)]
pub struct HashRegistry {
    algorithms: Vec<Arc<dyn SnapshotHasher>>,
}

impl Default for HashRegistry {
    fn default() -> Self {
        Self::with_algorithms(vec![
            Arc::new(BlockPerceptualHash::default()),
            Arc::new(StructuralHash),
        ])
    }
}

impl HashRegistry {
    pub fn with_algorithms(algorithms: Vec<Arc<dyn SnapshotHasher>>) -> Self {
        Self { algorithms }
    }

    /// Hash the snapshot with every registered strategy, keeping only the
    /// strategies that produced a hash.
    pub fn generate_hashes(&self, snapshot: &CapturedSnapshot) -> SnapshotHashSet {
        let mut set = SnapshotHashSet::new();
        for algorithm in &self.algorithms {
            if let Some(hash) = algorithm.hash(snapshot) {
                set.insert(algorithm.name(), hash);
            }
        }
        debug!(algorithms = set.len(), "generated snapshot hashes");
        set
    }

    /// Whether two hash sets denote the same screen.
    ///
    /// Empty sets match only each other. Otherwise the sets match iff any
    /// algorithm present in both reports its two hashes as similar
    /// (any-match wins, not all-must-agree).
    pub fn compare_snapshot(&self, a: &SnapshotHashSet, b: &SnapshotHashSet) -> bool {
        if a.is_empty() || b.is_empty() {
            return a.is_empty() && b.is_empty();
        }

        for algorithm in &self.algorithms {
            if let (Some(ha), Some(hb)) = (a.get(algorithm.name()), b.get(algorithm.name())) {
                if algorithm.are_similar(ha, hb) {
                    return true;
                }
            }
        }
        false
    }
}
