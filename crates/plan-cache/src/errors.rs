use thiserror::Error;

/// Errors emitted by the plan cache.
///
/// A fingerprint hit whose snapshot no longer matches is NOT an error; it is
/// reported as a plain miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Raised when the backing store fails to read or write an entry.
    #[error("cache store failure: {0}")]
    Store(String),
}

impl CacheError {
    /// Helper for wrapping store-side failures.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
