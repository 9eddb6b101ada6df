use thiserror::Error;

/// Errors emitted while extracting tagged fields from model output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A required tag was absent from the response text. No partial result
    /// is returned when this is raised.
    #[error("missing required tag <{tag}> in model response")]
    MissingTag { tag: String },
}

impl ExtractionError {
    /// Helper for the missing-tag case.
    pub fn missing_tag(tag: impl Into<String>) -> Self {
        Self::MissingTag { tag: tag.into() }
    }
}
