//! Generation lifecycle for the change index.
//!
//! A [`ChangeTracker`] owns the currently published [`chx_index::ChangeIndex`]
//! generation. A refresh builds the next generation privately, then publishes
//! it: the tracker swaps it in, computes the delta against the generation it
//! replaced, hands the delta to every [`DeltaListener`], and drops the old
//! generation.
//!
//! # Key Types
//!
//! - [`ChangeTracker`] -- Holder of the current frozen generation
//! - [`DeltaListener`] -- Consumer of published deltas
//! - [`RevisionMirror`] -- Listener that mirrors the tracked base revisions

pub mod error;
pub mod listener;
pub mod mirror;
pub mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use listener::DeltaListener;
pub use mirror::RevisionMirror;
pub use tracker::{ChangeTracker, Published};
