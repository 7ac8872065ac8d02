//! Higher-level change descriptors consumed by the index.
//!
//! A [`Change`] is plain data: an optional before-state, an optional
//! after-state, and the status the backend reports for the change as a whole.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::path::VcsPath;
use crate::revision::RevisionNumber;
use crate::status::FileStatus;

/// One side of a change: the path and the revision of its content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRevision {
    pub path: VcsPath,
    #[serde(default)]
    pub revision: RevisionNumber,
}

impl ContentRevision {
    pub fn new(path: impl Into<VcsPath>, revision: impl Into<RevisionNumber>) -> Self {
        Self {
            path: path.into(),
            revision: revision.into(),
        }
    }
}

/// A change between a before-state and an after-state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub before: Option<ContentRevision>,
    pub after: Option<ContentRevision>,
    pub status: FileStatus,
}

impl Change {
    /// Create a change with the default status for its shape: `ADDED` when
    /// there is no before-state, `DELETED` when there is no after-state,
    /// `MODIFIED` otherwise.
    pub fn new(before: Option<ContentRevision>, after: Option<ContentRevision>) -> Self {
        let status = match (&before, &after) {
            (None, _) => FileStatus::Added,
            (Some(_), None) => FileStatus::Deleted,
            (Some(_), Some(_)) => FileStatus::Modified,
        };
        Self {
            before,
            after,
            status,
        }
    }

    /// Like [`Change::new`], but rejects a change with neither side.
    pub fn try_new(
        before: Option<ContentRevision>,
        after: Option<ContentRevision>,
    ) -> Result<Self, TypeError> {
        if before.is_none() && after.is_none() {
            return Err(TypeError::EmptyChange);
        }
        Ok(Self::new(before, after))
    }

    /// Override the reported status.
    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns `true` if both sides exist at different paths.
    pub fn is_rename(&self) -> bool {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => before.path != after.path,
            _ => false,
        }
    }

    /// Path of the after-state if present, otherwise of the before-state.
    pub fn path(&self) -> Option<&VcsPath> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|rev| &rev.path)
    }
}

/// A before/after pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeforeAfter<T> {
    pub before: T,
    pub after: T,
}

impl<T> BeforeAfter<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }
}
