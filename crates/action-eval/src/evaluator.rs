//! Compilation and dispatch of command programs.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bindings::Bindings;
use crate::command::{strip_code_fences, CommandInvocation, CommandProgram};
use crate::context::SharedContext;
use crate::errors::{CapabilityError, CompileCause, EvalError};

/// A parsed, name-resolved action ready to execute.
#[derive(Debug, Clone)]
pub struct CompiledAction {
    code: String,
    invocations: Vec<CommandInvocation>,
}

impl CompiledAction {
    /// Compile action source against the injected bindings.
    ///
    /// Fails closed: syntax errors, empty programs and unknown capability
    /// names all surface as [`EvalError::Compile`] carrying the offending
    /// source, rather than escaping raw or deferring to run time.
    pub fn compile(code: &str, bindings: &Bindings) -> Result<Self, EvalError> {
        let cleaned = strip_code_fences(code);
        let program = CommandProgram::parse(cleaned)
            .map_err(|err| EvalError::compile(cleaned, CompileCause::Syntax(err)))?;

        let invocations = program.into_invocations();
        if invocations.is_empty() {
            return Err(EvalError::compile(cleaned, CompileCause::EmptyProgram));
        }
        for invocation in &invocations {
            if !bindings.contains(&invocation.call) {
                return Err(EvalError::compile(
                    cleaned,
                    CompileCause::UnknownCapability(invocation.call.clone()),
                ));
            }
        }

        Ok(Self {
            code: cleaned.to_string(),
            invocations,
        })
    }

    /// Run the program's invocations in order.
    ///
    /// A capability failure propagates as-is; the caller decides whether to
    /// retry or abort.
    pub async fn execute(
        &self,
        bindings: &Bindings,
        ctx: &mut SharedContext,
    ) -> Result<EvalOutcome, CapabilityError> {
        let mut result = Value::Null;
        for invocation in &self.invocations {
            let capability = bindings.get(&invocation.call).ok_or_else(|| {
                CapabilityError::new(format!(
                    "capability `{}` missing from execution bindings",
                    invocation.call
                ))
            })?;
            debug!(call = %invocation.call, "dispatching action invocation");
            result = capability.invoke(&invocation.args, ctx).await?;
        }
        Ok(EvalOutcome {
            code: self.code.clone(),
            result,
            shared_context: ctx.clone(),
        })
    }
}

/// Result of a successful action execution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvalOutcome {
    /// The source that ran, after fence stripping.
    pub code: String,
    /// The last invocation's return value.
    pub result: Value,
    /// The shared context as of completion.
    pub shared_context: SharedContext,
}

/// Convenience wrapper owning the bindings and the cross-turn shared
/// context.
pub struct ActionEvaluator {
    bindings: Bindings,
    shared: SharedContext,
}

impl ActionEvaluator {
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            shared: SharedContext::new(),
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn shared_context(&self) -> &SharedContext {
        &self.shared
    }

    /// Compile and execute one action, carrying the shared context forward.
    pub async fn evaluate(&mut self, code: &str) -> Result<EvalOutcome, EvalError> {
        let compiled = CompiledAction::compile(code, &self.bindings)?;
        let outcome = compiled.execute(&self.bindings, &mut self.shared).await?;
        Ok(outcome)
    }
}
