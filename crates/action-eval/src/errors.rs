use thiserror::Error;

/// Errors emitted while compiling or executing an action.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The action source failed to compile into a callable unit. Carries
    /// the offending source and the original underlying error.
    #[error("failed to compile action code: {cause}; offending source: {code}")]
    Compile {
        code: String,
        #[source]
        cause: CompileCause,
    },

    /// A capability failed at runtime. Propagated as-is, not wrapped.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

impl EvalError {
    pub fn compile(code: impl Into<String>, cause: CompileCause) -> Self {
        Self::Compile {
            code: code.into(),
            cause,
        }
    }
}

/// Why action source failed to compile.
#[derive(Debug, Error)]
pub enum CompileCause {
    /// The source was not a valid command program.
    #[error("invalid command syntax: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The program named a capability absent from the injected bindings.
    #[error("unknown capability `{0}`")]
    UnknownCapability(String),

    /// The program parsed but contained no invocations.
    #[error("program contains no invocations")]
    EmptyProgram,
}

/// Runtime failure raised by a capability during action execution.
///
/// The evaluator never retries these; the caller decides whether the run
/// survives.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CapabilityError {
    message: String,
}

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
