//! Per-path change records and the revisions reported in deltas.

use serde::{Deserialize, Serialize};

use crate::path::VcsPath;
use crate::revision::{RevisionNumber, VcsKey};
use crate::status::FileStatus;

/// The latest known change state of one path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Status reported for the path.
    pub status: FileStatus,
    /// Backend that produced the record.
    pub owner: VcsKey,
    /// Base revision of the change, or NULL if there is none.
    pub revision: RevisionNumber,
}

impl ChangeRecord {
    /// Create a new record.
    pub fn new(status: FileStatus, owner: VcsKey, revision: RevisionNumber) -> Self {
        Self {
            status,
            owner,
            revision,
        }
    }

    /// Returns `true` if both records point at the same base revision of the
    /// same backend. Status is not part of the comparison.
    pub fn same_revisions(&self, other: &ChangeRecord) -> bool {
        self.owner == other.owner && self.revision == other.revision
    }

    /// Materialize this record as a [`BaseRevision`] at `path`.
    pub fn base_revision(&self, path: &VcsPath) -> BaseRevision {
        BaseRevision::new(self.owner.clone(), self.revision.clone(), path.clone())
    }
}

/// One endpoint of a delta: which backend, at which revision, for which path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseRevision {
    pub owner: VcsKey,
    pub revision: RevisionNumber,
    pub path: VcsPath,
}

impl BaseRevision {
    pub fn new(owner: VcsKey, revision: RevisionNumber, path: VcsPath) -> Self {
        Self {
            owner,
            revision,
            path,
        }
    }
}
