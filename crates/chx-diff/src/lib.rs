//! Delta computation between two change index generations.
//!
//! Given the previous and the freshly built [`chx_index::ChangeIndex`], works
//! out which paths stopped being changed, which started being changed, and
//! which stayed changed but moved to a different base revision or backend.
//!
//! # Key Types
//!
//! - [`SnapshotDelta`] -- Removed / added / modified base revisions
//! - [`PathPartition`] -- The disjoint split of both key sets behind a delta

pub mod snapshot_diff;

pub use snapshot_diff::{diff_snapshots, partition_paths, PathPartition, SnapshotDelta};
