//! Boundary to the generative-model transport.

use async_trait::async_trait;
use thiserror::Error;

/// Black-box prompt transport: one prompt in, exactly one candidate text
/// out.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Run one prompt, optionally attaching a screen image.
    async fn run_prompt(
        &self,
        prompt: &str,
        image: Option<&[u8]>,
    ) -> Result<String, PromptServiceError>;
}

/// Failures of the prompt transport. Never silently substituted; the loop
/// retries within its per-turn attempt budget and then escalates.
#[derive(Debug, Error)]
pub enum PromptServiceError {
    #[error("prompt transport failure: {0}")]
    Transport(String),

    #[error("prompt service returned no candidates")]
    EmptyResponse,
}

impl PromptServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
