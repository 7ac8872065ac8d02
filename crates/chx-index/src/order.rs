//! Hierarchy-aware path ordering.
//!
//! Paths are compared segment by segment. When one path runs out of segments
//! first it is an ancestor of the other and sorts first, so every directory
//! precedes its descendants and each subtree occupies a contiguous range of
//! the ordering. Paths that differ only by redundant separators, or by case
//! under a case-insensitive order, compare equal.

use std::cmp::Ordering;

use chx_types::VcsPath;
use serde::{Deserialize, Serialize};

/// Case sensitivity policy for path comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
    /// Follow the host filesystem convention.
    #[default]
    System,
}

impl CaseSensitivity {
    /// Resolve [`CaseSensitivity::System`] for the current platform.
    pub fn is_sensitive(self) -> bool {
        match self {
            CaseSensitivity::Sensitive => true,
            CaseSensitivity::Insensitive => false,
            CaseSensitivity::System => !cfg!(any(target_os = "windows", target_os = "macos")),
        }
    }
}

/// The sort key of a path under a given [`PathOrder`].
///
/// Derived ordering is the hierarchical ordering: relative before absolute,
/// then segment-wise, a prefix before any extension of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    absolute: bool,
    segments: Vec<String>,
}

impl PathKey {
    /// Returns `true` if `self` equals `other` or is one of its ancestors.
    pub fn contains(&self, other: &PathKey) -> bool {
        self.absolute == other.absolute && other.segments.starts_with(&self.segments)
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &PathKey) -> bool {
        self.contains(other) && other.segments.len() > self.segments.len()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

/// A total, hierarchy-aware order over [`VcsPath`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathOrder {
    case_sensitive: bool,
}

impl PathOrder {
    /// Byte-exact segment comparison.
    pub const CASE_SENSITIVE: PathOrder = PathOrder {
        case_sensitive: true,
    };

    /// Segment comparison after lowercasing.
    pub const CASE_INSENSITIVE: PathOrder = PathOrder {
        case_sensitive: false,
    };

    /// Order following the host filesystem convention.
    pub fn system() -> Self {
        Self::new(CaseSensitivity::System)
    }

    pub fn new(sensitivity: CaseSensitivity) -> Self {
        Self {
            case_sensitive: sensitivity.is_sensitive(),
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Compute the sort key of `path`.
    pub fn key(&self, path: &VcsPath) -> PathKey {
        PathKey {
            absolute: path.is_absolute(),
            segments: path.segments().map(|s| self.fold(s)).collect(),
        }
    }

    /// Compare two paths without allocating. Agrees with comparing their keys.
    pub fn compare(&self, a: &VcsPath, b: &VcsPath) -> Ordering {
        a.is_absolute().cmp(&b.is_absolute()).then_with(|| {
            let mut left = a.segments();
            let mut right = b.segments();
            loop {
                match (left.next(), right.next()) {
                    (None, None) => return Ordering::Equal,
                    (None, Some(_)) => return Ordering::Less,
                    (Some(_), None) => return Ordering::Greater,
                    (Some(l), Some(r)) => match self.compare_segments(l, r) {
                        Ordering::Equal => {}
                        unequal => return unequal,
                    },
                }
            }
        })
    }

    /// Returns `true` if both paths map to the same index entry.
    pub fn same_path(&self, a: &VcsPath, b: &VcsPath) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    fn compare_segments(&self, l: &str, r: &str) -> Ordering {
        if self.case_sensitive {
            l.cmp(r)
        } else {
            l.chars()
                .flat_map(char::to_lowercase)
                .cmp(r.chars().flat_map(char::to_lowercase))
        }
    }

    // Per-char lowering, not `str::to_lowercase`, so keys agree with `compare`.
    fn fold(&self, segment: &str) -> String {
        if self.case_sensitive {
            segment.to_string()
        } else {
            segment.chars().flat_map(char::to_lowercase).collect()
        }
    }
}

impl Default for PathOrder {
    fn default() -> Self {
        Self::system()
    }
}

impl From<CaseSensitivity> for PathOrder {
    fn from(sensitivity: CaseSensitivity) -> Self {
        Self::new(sensitivity)
    }
}
