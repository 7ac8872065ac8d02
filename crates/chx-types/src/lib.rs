//! Foundation types for the hierarchical change index (CHX).
//!
//! Every other CHX crate depends on `chx-types`. The types here are plain
//! immutable values; none of them know about ordering policies or snapshots.
//!
//! # Key Types
//!
//! - [`VcsPath`] -- Normalized hierarchical path with parent/child relations
//! - [`FileStatus`] -- Closed set of change statuses reported by a backend
//! - [`VcsKey`] -- Opaque identifier of the backend that owns a change
//! - [`RevisionNumber`] -- Comparable revision marker with a distinguished NULL
//! - [`ChangeRecord`] -- The `(status, owner, revision)` triple stored per path
//! - [`BaseRevision`] -- `(owner, revision, path)` endpoint reported in deltas
//! - [`Change`] / [`ContentRevision`] -- Before/after change descriptor

pub mod change;
pub mod error;
pub mod path;
pub mod record;
pub mod revision;
pub mod status;

pub use change::{BeforeAfter, Change, ContentRevision};
pub use error::TypeError;
pub use path::VcsPath;
pub use record::{BaseRevision, ChangeRecord};
pub use revision::{RevisionNumber, VcsKey};
pub use status::FileStatus;
