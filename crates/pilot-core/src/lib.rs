//! Agent loop for autonomous UI exploration.
//!
//! One run drives an application toward a natural-language goal through
//! repeated perceive-decide-act turns: capture the screen, consult the plan
//! cache, prompt the generative model on a miss, extract its tagged output,
//! optionally perform the chosen action through the command evaluator, and
//! stop when the model reports the goal achieved or the step budget runs
//! out.
//!
//! The concrete application driver and the model transport stay behind the
//! [`AppDriver`] and [`PromptService`] traits; cache persistence stays
//! behind [`plan_cache::CacheStore`].

pub mod config;
pub mod driver;
pub mod errors;
pub mod performer;
pub mod pilot;
pub mod prompt;
pub mod prompt_service;
pub mod types;

pub use config::{PilotConfig, ReviewSectionConfig};
pub use driver::{AppDriver, DriverError};
pub use errors::PilotError;
pub use performer::ActionPerformer;
pub use pilot::Pilot;
pub use prompt_service::{PromptService, PromptServiceError};
pub use types::{
    PerformedStep, ReviewReport, RunReport, RunStatus, ScreenAnalysis, StepReport,
};

// Re-export the collaborator types a host needs to assemble a pilot.
pub use action_eval::{Bindings, Capability, CapabilityError, SharedContext};
pub use pilot_core_types::{CapturedSnapshot, StepRecord};
pub use plan_cache::{CacheEntry, CacheStore, MemoryCacheStore};
pub use snapshot_hash::{HashRegistry, SnapshotHashSet};
