//! Hierarchical paths.
//!
//! A [`VcsPath`] is stored in normalized form: `/`-separated, no repeated
//! separators, no trailing separator. Two spellings of the same path
//! (`/a//b/` and `/a/b`) therefore produce equal values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: char = '/';

/// A normalized hierarchical path.
///
/// Ordering is segment-wise and byte-exact: a path sorts immediately before
/// its descendants, and siblings sort by segment. Relative paths sort before
/// absolute ones. Case-insensitive ordering is a property of an index, not of
/// the path itself; see `chx_index::PathOrder`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VcsPath {
    normalized: String,
}

impl VcsPath {
    /// Create a path, normalizing separators.
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref();
        let absolute = raw.starts_with(SEPARATOR);
        let joined = raw
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        let normalized = if absolute {
            format!("/{joined}")
        } else {
            joined
        };
        Self { normalized }
    }

    /// The filesystem root `/`.
    pub fn root() -> Self {
        Self {
            normalized: SEPARATOR.to_string(),
        }
    }

    /// The normalized string form.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns `true` if the path starts at the root.
    pub fn is_absolute(&self) -> bool {
        self.normalized.starts_with(SEPARATOR)
    }

    /// Returns `true` for `/` and for the empty relative path.
    pub fn is_root(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Iterate over the non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.normalized.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The parent path, or `None` for a root.
    pub fn parent(&self) -> Option<VcsPath> {
        if self.is_root() {
            return None;
        }
        let cut = self.normalized.rfind(SEPARATOR);
        let normalized = match cut {
            Some(0) => SEPARATOR.to_string(),
            Some(i) => self.normalized[..i].to_string(),
            None => String::new(),
        };
        Some(Self { normalized })
    }

    /// Append a child segment (which may itself contain separators).
    pub fn join(&self, child: impl AsRef<str>) -> VcsPath {
        if self.normalized.is_empty() {
            return Self::new(child);
        }
        Self::new(format!("{}/{}", self.normalized, child.as_ref()))
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    ///
    /// Segments are compared byte-exact.
    pub fn is_ancestor_of(&self, other: &VcsPath) -> bool {
        if self.is_absolute() != other.is_absolute() {
            return false;
        }
        let mut theirs = other.segments();
        for ours in self.segments() {
            match theirs.next() {
                Some(s) if s == ours => {}
                _ => return false,
            }
        }
        theirs.next().is_some()
    }
}

impl Ord for VcsPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_absolute()
            .cmp(&other.is_absolute())
            .then_with(|| self.segments().cmp(other.segments()))
    }
}

impl PartialOrd for VcsPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for VcsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VcsPath({:?})", self.normalized)
    }
}

impl fmt::Display for VcsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl From<&str> for VcsPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for VcsPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<VcsPath> for String {
    fn from(path: VcsPath) -> Self {
        path.normalized
    }
}
