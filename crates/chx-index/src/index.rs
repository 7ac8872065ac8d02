//! The change index: an ordered map from path to its latest change record.
//!
//! One [`ChangeIndex`] is one generation. It is populated by a single writer
//! from one consistent scan of local changes, then frozen and compared with
//! the previous generation (see `chx-diff`).

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;

use chx_types::{BaseRevision, Change, ChangeRecord, FileStatus, RevisionNumber, VcsKey, VcsPath};
use tracing::debug;

use crate::config::IndexConfig;
use crate::order::{PathKey, PathOrder};

/// A tracked path together with its record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// The path as last written. Under a case-insensitive order this is the
    /// spelling of the most recent `add`.
    pub path: VcsPath,
    pub record: ChangeRecord,
}

impl IndexEntry {
    /// The entry as a reported revision.
    pub fn base_revision(&self) -> BaseRevision {
        self.record.base_revision(&self.path)
    }
}

/// One generation of the path -> change record map.
///
/// At most one record exists per path; writing a path that is equal for
/// indexing to an existing one replaces it.
#[derive(Clone, Debug)]
pub struct ChangeIndex {
    order: PathOrder,
    entries: BTreeMap<PathKey, IndexEntry>,
}

impl ChangeIndex {
    /// Create an empty index ordered by `order`.
    pub fn new(order: PathOrder) -> Self {
        Self {
            order,
            entries: BTreeMap::new(),
        }
    }

    /// Create an empty index from a configuration.
    pub fn with_config(config: &IndexConfig) -> Self {
        Self::new(config.order())
    }

    /// The ordering used for keys.
    pub fn order(&self) -> PathOrder {
        self.order
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert or overwrite the record at `path`.
    pub fn add(
        &mut self,
        path: VcsPath,
        status: FileStatus,
        owner: VcsKey,
        revision: RevisionNumber,
    ) {
        debug!(path = %path, status = %status, owner = %owner, "set status");
        let key = self.order.key(&path);
        let record = ChangeRecord::new(status, owner, revision);
        self.entries.insert(key, IndexEntry { path, record });
    }

    /// Remove the record at `path`, returning it if there was one.
    pub fn remove(&mut self, path: &VcsPath) -> Option<ChangeRecord> {
        self.entries
            .remove(&self.order.key(path))
            .map(|entry| entry.record)
    }

    /// Index both sides of `change` on behalf of `owner`.
    ///
    /// - The after-path gets the change's status and the before-state's
    ///   revision (NULL if the file is new).
    /// - On a move, the before-path is recorded as `DELETED` at its own
    ///   revision.
    /// - On a deletion, the before-path gets the change's status.
    ///
    /// An in-place modification writes a single entry.
    pub fn change_added(&mut self, change: &Change, owner: &VcsKey) {
        let before = change.before.as_ref();
        if let Some(after) = &change.after {
            let base = before
                .map(|b| b.revision.clone())
                .unwrap_or(RevisionNumber::NULL);
            self.add(after.path.clone(), change.status, owner.clone(), base);
        }
        if let Some(before) = before {
            match &change.after {
                Some(after) => {
                    if !self.order.same_path(&before.path, &after.path) {
                        self.add(
                            before.path.clone(),
                            FileStatus::Deleted,
                            owner.clone(),
                            before.revision.clone(),
                        );
                    }
                }
                None => {
                    self.add(
                        before.path.clone(),
                        change.status,
                        owner.clone(),
                        before.revision.clone(),
                    );
                }
            }
        }
    }

    /// Drop the entries of both sides of `change`, if present.
    pub fn change_removed(&mut self, change: &Change) {
        if let Some(after) = &change.after {
            self.remove(&after.path);
        }
        if let Some(before) = &change.before {
            self.remove(&before.path);
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Status of `path`, or `None` if it is not tracked.
    pub fn status_of(&self, path: &VcsPath) -> Option<FileStatus> {
        self.record_of(path).map(|record| record.status)
    }

    /// Base revision of `path`, or `None` if it is not tracked.
    pub fn revision_of(&self, path: &VcsPath) -> Option<&RevisionNumber> {
        self.record_of(path).map(|record| &record.revision)
    }

    /// Full record of `path`.
    pub fn record_of(&self, path: &VcsPath) -> Option<&ChangeRecord> {
        self.get(path).map(|entry| &entry.record)
    }

    /// Entry for `path`, carrying the spelling it was stored under.
    pub fn get(&self, path: &VcsPath) -> Option<&IndexEntry> {
        self.entries.get(&self.order.key(path))
    }

    /// Returns `true` if `path` is tracked.
    pub fn contains(&self, path: &VcsPath) -> bool {
        self.entries.contains_key(&self.order.key(path))
    }

    /// Owner of `change`, looked up by its after-path first, then by its
    /// before-path.
    pub fn owner_of(&self, change: &Change) -> Option<&VcsKey> {
        let after = change
            .after
            .as_ref()
            .and_then(|rev| self.record_of(&rev.path));
        let before = || {
            change
                .before
                .as_ref()
                .and_then(|rev| self.record_of(&rev.path))
        };
        after.or_else(before).map(|record| &record.owner)
    }

    /// All tracked paths in hierarchical order.
    pub fn affected_paths(&self) -> impl DoubleEndedIterator<Item = &VcsPath> + ExactSizeIterator + '_ {
        self.entries.values().map(|entry| &entry.path)
    }

    /// Every entry as a reported revision, in path order.
    pub fn affected_files_under_vcs(&self) -> Vec<BaseRevision> {
        self.entries.values().map(IndexEntry::base_revision).collect()
    }

    /// All entries in path order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &IndexEntry> + ExactSizeIterator + '_ {
        self.entries.values()
    }

    /// `path` itself (if tracked) followed by every tracked descendant.
    pub fn under<'a>(&'a self, path: &VcsPath) -> impl Iterator<Item = &'a IndexEntry> + 'a {
        let root = self.order.key(path);
        self.entries
            .range((Bound::Included(root.clone()), Bound::Unbounded))
            .take_while(move |(key, _)| root.contains(key))
            .map(|(_, entry)| entry)
    }

    // ---------------------------------------------------------------
    // Keyed access for snapshot comparison
    // ---------------------------------------------------------------

    /// Keys and entries in order.
    pub fn entries(&self) -> btree_map::Iter<'_, PathKey, IndexEntry> {
        self.entries.iter()
    }

    /// Entry stored under `key`.
    pub fn entry(&self, key: &PathKey) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &PathKey) -> bool {
        self.entries.contains_key(key)
    }

    /// A copy of this index keyed under `order`.
    ///
    /// Entries that collide under the new order keep the last one in the old
    /// order.
    pub fn rekeyed(&self, order: PathOrder) -> ChangeIndex {
        let mut rekeyed = ChangeIndex::new(order);
        for entry in self.entries.values() {
            rekeyed
                .entries
                .insert(order.key(&entry.path), entry.clone());
        }
        rekeyed
    }
}

impl Default for ChangeIndex {
    fn default() -> Self {
        Self::new(PathOrder::default())
    }
}

impl<'a> IntoIterator for &'a ChangeIndex {
    type Item = &'a IndexEntry;
    type IntoIter = btree_map::Values<'a, PathKey, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
