use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping algorithm-name -> hash string, produced fresh for every captured
/// screen.
///
/// An algorithm that could not produce a hash is simply absent from the set,
/// never present with a null value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotHashSet(BTreeMap<String, String>);

impl SnapshotHashSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, algorithm: impl Into<String>, hash: impl Into<String>) {
        self.0.insert(algorithm.into(), hash.into());
    }

    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Algorithm names present in this set.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for SnapshotHashSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_is_a_plain_map() {
        let mut set = SnapshotHashSet::new();
        set.insert("structural", "abc123");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"structural":"abc123"}"#);

        let back: SnapshotHashSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
