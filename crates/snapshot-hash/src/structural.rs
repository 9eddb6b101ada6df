//! Structural hash over the serialized view hierarchy.

use blake3::Hasher;
use pilot_core_types::CapturedSnapshot;

use crate::algorithm::SnapshotHasher;

/// Content digest of the view hierarchy; similarity is exact equality.
///
/// Collision resistance is not required here, only a fast content digest
/// that distinguishes structurally different screens.
#[derive(Debug, Clone, Default)]
pub struct StructuralHash;

impl StructuralHash {
    /// Hex digest of an arbitrary hierarchy string.
    pub fn digest(text: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

impl SnapshotHasher for StructuralHash {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn hash(&self, snapshot: &CapturedSnapshot) -> Option<String> {
        snapshot
            .view_hierarchy
            .as_deref()
            .map(StructuralHash::digest)
    }

    fn are_similar(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_exact_digest_equality() {
        let hasher = StructuralHash;
        let a = StructuralHash::digest("<view><button label=\"Ok\"/></view>");
        let b = StructuralHash::digest("<view><button label=\"Ok\"/></view>");
        let c = StructuralHash::digest("<view><button label=\"Cancel\"/></view>");

        assert!(hasher.are_similar(&a, &b));
        assert!(!hasher.are_similar(&a, &c));
        assert_ne!(a, c);
    }

    #[test]
    fn test_absent_without_hierarchy() {
        let hasher = StructuralHash;
        let snapshot = CapturedSnapshot::new(Some(vec![1, 2, 3]), None);
        assert!(hasher.hash(&snapshot).is_none());

        let with_hierarchy = CapturedSnapshot::from_hierarchy("<root/>");
        assert!(hasher.hash(&with_hierarchy).is_some());
    }
}
