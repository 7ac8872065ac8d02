//! File change statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The status a backend reports for a changed file.
///
/// The index stores statuses as opaque labels; only [`FileStatus::Deleted`]
/// is produced by the index itself (for the old side of a move).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    NotChanged,
    Modified,
    Added,
    Deleted,
    Unknown,
    Ignored,
    Merged,
    MergedWithConflicts,
    Hijacked,
    Switched,
    Obsolete,
}

impl FileStatus {
    /// All statuses, in declaration order.
    pub const ALL: [FileStatus; 11] = [
        FileStatus::NotChanged,
        FileStatus::Modified,
        FileStatus::Added,
        FileStatus::Deleted,
        FileStatus::Unknown,
        FileStatus::Ignored,
        FileStatus::Merged,
        FileStatus::MergedWithConflicts,
        FileStatus::Hijacked,
        FileStatus::Switched,
        FileStatus::Obsolete,
    ];

    /// Stable identifier, e.g. `"MODIFIED"`.
    pub fn id(&self) -> &'static str {
        match self {
            FileStatus::NotChanged => "NOT_CHANGED",
            FileStatus::Modified => "MODIFIED",
            FileStatus::Added => "ADDED",
            FileStatus::Deleted => "DELETED",
            FileStatus::Unknown => "UNKNOWN",
            FileStatus::Ignored => "IGNORED",
            FileStatus::Merged => "MERGED",
            FileStatus::MergedWithConflicts => "MERGED_WITH_CONFLICTS",
            FileStatus::Hijacked => "HIJACKED",
            FileStatus::Switched => "SWITCHED",
            FileStatus::Obsolete => "OBSOLETE",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FileStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileStatus::ALL
            .into_iter()
            .find(|status| status.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}
