//! Isolated execution of model-chosen actions.
//!
//! Model output is attacker-supplied in practice, so actions are not free
//! code: they are a restricted command language ("call capability X with
//! arguments Y") interpreted by a fixed dispatcher over explicitly injected
//! [`Bindings`]. No filesystem or network authority is reachable except
//! through a bound capability. A shared, versioned key-value context is
//! carried across successive actions of the same run.

pub mod bindings;
pub mod command;
pub mod context;
pub mod errors;
pub mod evaluator;

pub use bindings::{Bindings, Capability};
pub use command::{strip_code_fences, CommandInvocation, CommandProgram};
pub use context::SharedContext;
pub use errors::{CapabilityError, CompileCause, EvalError};
pub use evaluator::{ActionEvaluator, CompiledAction, EvalOutcome};
