//! Perceptual and structural fingerprints of captured screen state.
//!
//! Two hashing strategies sit behind the [`SnapshotHasher`] contract:
//!
//! - **Block perceptual hash**: a 16x16 block-median hash of the screen
//!   image, tolerant to minor rendering differences.
//! - **Structural hash**: a blake3 digest of the serialized view hierarchy,
//!   matching on exact structural identity.
//!
//! The [`HashRegistry`] runs every strategy over a snapshot and compares the
//! resulting [`SnapshotHashSet`]s with an any-match-wins policy.

pub mod algorithm;
pub mod perceptual;
pub mod registry;
pub mod set;
pub mod structural;

pub use algorithm::SnapshotHasher;
pub use perceptual::BlockPerceptualHash;
pub use registry::HashRegistry;
pub use set::SnapshotHashSet;
pub use structural::StructuralHash;
