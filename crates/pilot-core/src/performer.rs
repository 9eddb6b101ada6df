//! Turns an analysis-chosen action into a command program and executes it.

use action_eval::{ActionEvaluator, Bindings, EvalOutcome};
use pilot_core_types::CapturedSnapshot;
use tag_extractor::{extract, FieldSchema};
use tracing::{debug, warn};

use crate::errors::PilotError;
use crate::prompt;
use crate::prompt_service::PromptService;
use crate::types::PerformedStep;

/// Asks the model for a command program realizing one action, then runs it.
///
/// Keeps the run-scoped list of performed `{step, code, result}` tuples that
/// later code prompts replay, and owns the evaluator whose shared context
/// persists across turns.
pub struct ActionPerformer {
    evaluator: ActionEvaluator,
    performed: Vec<PerformedStep>,
}

impl ActionPerformer {
    pub fn new(bindings: Bindings) -> Self {
        Self {
            evaluator: ActionEvaluator::new(bindings),
            performed: Vec::new(),
        }
    }

    /// Performed tuples so far, in execution order.
    pub fn performed(&self) -> &[PerformedStep] {
        &self.performed
    }

    pub fn evaluator(&self) -> &ActionEvaluator {
        &self.evaluator
    }

    /// Request code for `action` and execute it against the highlighted
    /// capture.
    ///
    /// Prompt and extraction failures are retried up to `max_attempts`;
    /// compile and capability runtime failures are not retried here and
    /// propagate to the caller.
    pub async fn perform(
        &mut self,
        prompt_service: &dyn PromptService,
        action: &str,
        snapshot: &CapturedSnapshot,
        max_attempts: u32,
    ) -> Result<EvalOutcome, PilotError> {
        let attempts = max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.request_code(prompt_service, action, snapshot).await {
                Ok(code) => {
                    debug!(attempt, action, "executing action code");
                    let outcome = self.evaluator.evaluate(&code).await?;
                    self.performed.push(PerformedStep {
                        step: action.to_string(),
                        code: outcome.code.clone(),
                        result: outcome.result.clone(),
                    });
                    return Ok(outcome);
                }
                Err(err) if err.is_retryable() => {
                    warn!(attempt, error = %err, "action code attempt failed");
                    last_error = err.to_string();
                }
                Err(err) => return Err(err),
            }
        }

        Err(PilotError::AttemptsExhausted {
            attempts,
            last_error,
        })
    }

    async fn request_code(
        &self,
        prompt_service: &dyn PromptService,
        action: &str,
        snapshot: &CapturedSnapshot,
    ) -> Result<String, PilotError> {
        let hierarchy = snapshot.view_hierarchy.as_deref().unwrap_or_default();
        let capabilities = self.evaluator.bindings().names();
        let prompt =
            prompt::format_action_code_prompt(action, hierarchy, &capabilities, &self.performed);

        let response = prompt_service
            .run_prompt(&prompt, snapshot.image.as_deref())
            .await?;
        let fields = extract(&response, &FieldSchema::action_code())?;
        Ok(fields.required("code")?.to_string())
    }
}
