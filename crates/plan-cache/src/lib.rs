//! Fingerprint-keyed cache of analysis plans, validated against the live
//! screen before replay.
//!
//! A fingerprint derives deterministically from the goal and ordered step
//! history; a stored plan is only replayed when the screen the plan was
//! computed on still matches the visible one per the hashing registry's
//! comparison policy. Persistence lives behind the narrow [`CacheStore`]
//! boundary; this crate only reads and writes through it.

pub mod coordinator;
pub mod errors;
pub mod store;

pub use coordinator::CacheCoordinator;
pub use errors::CacheError;
pub use store::{CacheEntry, CacheStore, MemoryCacheStore};
