//! Boundary to the application under exploration.

use async_trait::async_trait;
use thiserror::Error;

/// Perception and gesture surface of the app under test.
///
/// Image capture is optional per driver; a driver without it returns
/// `Ok(None)` and the loop degrades gracefully (no perceptual hashing, no
/// image-attached prompting).
#[async_trait]
pub trait AppDriver: Send + Sync {
    /// Capture the current screen image, optionally with interaction
    /// highlights overlaid.
    async fn capture_snapshot_image(
        &self,
        with_highlights: bool,
    ) -> Result<Option<Vec<u8>>, DriverError>;

    /// Capture the serialized view hierarchy.
    async fn capture_view_hierarchy(&self) -> Result<String, DriverError>;

    /// Whether this driver can produce screen images at all.
    fn is_snapshot_image_supported(&self) -> bool;
}

/// Errors surfaced by the driver boundary.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Snapshot capture failed; unrecoverable for the current run.
    #[error("snapshot capture failed: {0}")]
    Capture(String),
}

impl DriverError {
    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture(message.into())
    }
}
