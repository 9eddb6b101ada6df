use thiserror::Error;

use crate::driver::DriverError;
use crate::prompt_service::PromptServiceError;

/// Errors that abort an exploration run.
///
/// Reaching the step budget is NOT among them; that is a defined terminal
/// state reported as [`RunStatus::LimitReached`](crate::RunStatus).
#[derive(Debug, Error)]
pub enum PilotError {
    /// Unrecoverable driver failure.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A single prompt attempt failed; retried within the turn's attempt
    /// budget before escalating as [`PilotError::AttemptsExhausted`].
    #[error(transparent)]
    PromptService(#[from] PromptServiceError),

    /// A single extraction attempt failed; same retry policy as prompt
    /// failures.
    #[error(transparent)]
    Extraction(#[from] tag_extractor::ExtractionError),

    /// Cache store failure during lookup.
    #[error(transparent)]
    Cache(#[from] plan_cache::CacheError),

    /// Action compile failure, or a capability runtime failure propagated
    /// unwrapped.
    #[error(transparent)]
    Evaluation(#[from] action_eval::EvalError),

    /// The per-turn attempt budget ran out. Carries the final attempt's
    /// error text rather than losing it.
    #[error("turn failed after {attempts} attempts: {last_error}")]
    AttemptsExhausted { attempts: u32, last_error: String },
}

impl PilotError {
    /// Whether one attempt's failure is worth another attempt.
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(
            self,
            PilotError::PromptService(_) | PilotError::Extraction(_)
        )
    }
}
