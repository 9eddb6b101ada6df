//! Shared primitives for the AppPilot exploration crates.
//!
//! Everything here is plain data: one captured observation of screen state
//! and one prior turn of the exploration loop. The crates that compute with
//! these types (hashing, caching, the run loop) depend on this crate rather
//! than on each other.

use serde::{Deserialize, Serialize};

/// One captured observation of screen state.
///
/// The image channel is optional per driver; the view hierarchy is optional
/// so hashing can treat "no hierarchy captured" as an absent channel rather
/// than an empty document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedSnapshot {
    /// Encoded screenshot bytes (PNG), when the driver supports image capture.
    pub image: Option<Vec<u8>>,
    /// Serialized view hierarchy, when one was captured.
    pub view_hierarchy: Option<String>,
}

impl CapturedSnapshot {
    pub fn new(image: Option<Vec<u8>>, view_hierarchy: Option<String>) -> Self {
        Self {
            image,
            view_hierarchy,
        }
    }

    /// Snapshot carrying only a view hierarchy, as captured by drivers
    /// without image support.
    pub fn from_hierarchy(view_hierarchy: impl Into<String>) -> Self {
        Self {
            image: None,
            view_hierarchy: Some(view_hierarchy.into()),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// One prior turn of the exploration loop, as replayed to later prompts.
///
/// Records are append-only: the loop never mutates an entry after pushing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    /// What the screen showed when this step was taken.
    pub screen_description: String,
    /// The action the model chose for this step.
    pub action: String,
    /// Error text when the step failed; surfaced to the next prompt attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    pub fn new(screen_description: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            screen_description: screen_description.into(),
            action: action.into(),
            error: None,
        }
    }

    /// Synthetic entry recording a failed attempt.
    pub fn with_error(
        screen_description: impl Into<String>,
        action: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            screen_description: screen_description.into(),
            action: action.into(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_channels() {
        let hierarchy_only = CapturedSnapshot::from_hierarchy("<root/>");
        assert!(!hierarchy_only.has_image());
        assert_eq!(hierarchy_only.view_hierarchy.as_deref(), Some("<root/>"));

        let full = CapturedSnapshot::new(Some(vec![1, 2, 3]), Some("<root/>".to_string()));
        assert!(full.has_image());
    }

    #[test]
    fn test_step_record_serialization_omits_absent_error() {
        let record = StepRecord::new("Login screen", "Tap the submit button");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("error"));

        let failed = StepRecord::with_error("Login screen", "Tap", "element not found");
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("element not found"));
    }
}
