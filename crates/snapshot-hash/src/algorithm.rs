use pilot_core_types::CapturedSnapshot;

/// Two-operation contract every hashing strategy implements.
///
/// Strategies are read-only over the snapshot; a strategy that cannot
/// produce a hash for a given snapshot (e.g. no image channel) returns
/// `None` rather than an error.
pub trait SnapshotHasher: Send + Sync {
    /// Stable algorithm name used as the key in a
    /// [`SnapshotHashSet`](crate::SnapshotHashSet).
    fn name(&self) -> &'static str;

    /// Produce a hash for the snapshot, or `None` when the snapshot lacks
    /// the channel this algorithm reads.
    fn hash(&self, snapshot: &CapturedSnapshot) -> Option<String>;

    /// Whether two previously produced hashes denote the same screen.
    fn are_similar(&self, a: &str, b: &str) -> bool;
}
