//! Snapshot diff: compare two generations of a change index.
//!
//! The key sets of both generations are split into three disjoint parts:
//! paths only in the old generation (removed), paths only in the new one
//! (added), and paths in both (candidates). A candidate is reported as
//! modified when its owner or base revision changed. Status changes alone are
//! not reported, so caches keyed by revision are not refetched when only the
//! displayed status flips.

use std::collections::BTreeSet;

use chx_index::{ChangeIndex, IndexEntry, PathKey};
use chx_types::{BaseRevision, BeforeAfter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The differences between two generations.
///
/// Each list is in path order and holds at most one item per path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    /// Paths no longer changed, with their old record.
    pub removed: Vec<BaseRevision>,
    /// Paths newly changed, with their new record.
    pub added: Vec<BaseRevision>,
    /// Paths changed in both generations whose owner or revision moved.
    pub modified: Vec<BeforeAfter<BaseRevision>>,
}

impl SnapshotDelta {
    /// Create an empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.modified.is_empty()
    }

    /// Total number of reported items.
    pub fn len(&self) -> usize {
        self.removed.len() + self.added.len() + self.modified.len()
    }

    /// Number of removed paths.
    pub fn removals(&self) -> usize {
        self.removed.len()
    }

    /// Number of added paths.
    pub fn additions(&self) -> usize {
        self.added.len()
    }

    /// Number of modified paths.
    pub fn modifications(&self) -> usize {
        self.modified.len()
    }
}

/// Disjoint split of the keys of two generations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathPartition<'a> {
    /// Keys only in the old generation.
    pub removed: BTreeSet<&'a PathKey>,
    /// Keys only in the new generation.
    pub added: BTreeSet<&'a PathKey>,
    /// Keys in both generations.
    pub candidates: BTreeSet<&'a PathKey>,
}

/// Split the key sets of `old` and `new`.
///
/// Both indexes are expected to share a path order; [`diff_snapshots`] takes
/// care of that.
pub fn partition_paths<'a>(old: &'a ChangeIndex, new: &'a ChangeIndex) -> PathPartition<'a> {
    let old_paths: BTreeSet<&PathKey> = old.entries().map(|(key, _)| key).collect();
    let new_paths: BTreeSet<&PathKey> = new.entries().map(|(key, _)| key).collect();

    let removed: BTreeSet<&PathKey> = old_paths.difference(&new_paths).copied().collect();
    let added: BTreeSet<&PathKey> = new_paths.difference(&old_paths).copied().collect();
    let candidates: BTreeSet<&PathKey> = old_paths.difference(&removed).copied().collect();

    PathPartition {
        removed,
        added,
        candidates,
    }
}

/// Compute the delta from `old` to `new`.
///
/// If the generations were built with different path orders, `new` is re-keyed
/// under the order of `old` first.
///
/// # Panics
///
/// Panics if a partitioned key cannot be found in the generation it was taken
/// from. That can only happen through a bug in the partition itself.
pub fn diff_snapshots(old: &ChangeIndex, new: &ChangeIndex) -> SnapshotDelta {
    if old.order() != new.order() {
        warn!(
            old_case_sensitive = old.order().is_case_sensitive(),
            new_case_sensitive = new.order().is_case_sensitive(),
            "snapshots use different path orders; re-keying new snapshot"
        );
        let rekeyed = new.rekeyed(old.order());
        return diff_same_order(old, &rekeyed);
    }
    diff_same_order(old, new)
}

fn diff_same_order(old: &ChangeIndex, new: &ChangeIndex) -> SnapshotDelta {
    let partition = partition_paths(old, new);

    let removed: Vec<BaseRevision> = partition
        .removed
        .iter()
        .map(|key| entry_for(old, key, "old").base_revision())
        .collect();

    let added: Vec<BaseRevision> = partition
        .added
        .iter()
        .map(|key| entry_for(new, key, "new").base_revision())
        .collect();

    let mut modified = Vec::new();
    for key in &partition.candidates {
        let before = entry_for(old, key, "old");
        let after = entry_for(new, key, "new");
        if !before.record.same_revisions(&after.record) {
            modified.push(BeforeAfter::new(
                before.base_revision(),
                after.base_revision(),
            ));
        }
    }

    let delta = SnapshotDelta {
        removed,
        added,
        modified,
    };
    debug!(
        removed = delta.removals(),
        added = delta.additions(),
        modified = delta.modifications(),
        "snapshot delta computed"
    );
    delta
}

fn entry_for<'a>(index: &'a ChangeIndex, key: &PathKey, side: &str) -> &'a IndexEntry {
    match index.entry(key) {
        Some(entry) => entry,
        None => panic!("{side} snapshot lost partitioned key {key:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chx_index::PathOrder;
    use chx_types::{Change, ContentRevision, FileStatus, RevisionNumber, VcsKey, VcsPath};
    use proptest::prelude::*;

    fn vcs(name: &str) -> VcsKey {
        VcsKey::new(name).unwrap()
    }

    fn p(s: &str) -> VcsPath {
        VcsPath::new(s)
    }

    fn rev(n: u64) -> RevisionNumber {
        RevisionNumber::from(n)
    }

    fn base(owner: &str, n: u64, path: &str) -> BaseRevision {
        BaseRevision::new(vcs(owner), rev(n), p(path))
    }

    fn make_index(entries: &[(&str, FileStatus, &str, u64)]) -> ChangeIndex {
        let mut idx = ChangeIndex::new(PathOrder::CASE_SENSITIVE);
        for (path, status, owner, n) in entries {
            idx.add(p(path), *status, vcs(owner), rev(*n));
        }
        idx
    }

    #[test]
    fn identical_snapshots_no_delta() {
        let idx = make_index(&[
            ("/a", FileStatus::Modified, "git", 1),
            ("/b", FileStatus::Added, "git", 2),
        ]);
        let delta = diff_snapshots(&idx, &idx.clone());
        assert!(delta.is_empty());
        assert_eq!(delta.len(), 0);
    }

    #[test]
    fn empty_to_populated_all_added() {
        let old = make_index(&[]);
        let new = make_index(&[
            ("/a", FileStatus::Added, "git", 0),
            ("/b", FileStatus::Added, "git", 0),
        ]);
        let delta = diff_snapshots(&old, &new);
        assert_eq!(delta.additions(), 2);
        assert_eq!(delta.removals(), 0);
        assert_eq!(delta.modifications(), 0);
    }

    #[test]
    fn populated_to_empty_all_removed() {
        let old = make_index(&[("/a", FileStatus::Modified, "git", 3)]);
        let new = make_index(&[]);
        let delta = diff_snapshots(&old, &new);
        assert_eq!(delta.removed, vec![base("git", 3, "/a")]);
        assert!(delta.added.is_empty());
    }

    #[test]
    fn end_to_end_scenario() {
        let old = make_index(&[("/a/x.txt", FileStatus::Modified, "VCS1", 5)]);
        let new = make_index(&[
            ("/a/x.txt", FileStatus::Added, "VCS1", 7),
            ("/a/y.txt", FileStatus::Added, "VCS1", 7),
        ]);

        let delta = diff_snapshots(&old, &new);
        assert!(delta.removed.is_empty());
        assert_eq!(delta.added, vec![base("VCS1", 7, "/a/y.txt")]);
        assert_eq!(
            delta.modified,
            vec![BeforeAfter::new(
                base("VCS1", 5, "/a/x.txt"),
                base("VCS1", 7, "/a/x.txt"),
            )]
        );
    }

    #[test]
    fn status_only_change_is_not_modified() {
        let old = make_index(&[("/a", FileStatus::Modified, "git", 5)]);
        let new = make_index(&[("/a", FileStatus::Merged, "git", 5)]);
        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn owner_change_is_modified() {
        let old = make_index(&[("/a", FileStatus::Modified, "git", 5)]);
        let new = make_index(&[("/a", FileStatus::Modified, "hg", 5)]);
        let delta = diff_snapshots(&old, &new);
        assert_eq!(
            delta.modified,
            vec![BeforeAfter::new(base("git", 5, "/a"), base("hg", 5, "/a"))]
        );
    }

    #[test]
    fn mixed_changes_in_path_order() {
        let old = make_index(&[
            ("/keep", FileStatus::Modified, "git", 1),
            ("/modify", FileStatus::Modified, "git", 2),
            ("/z/remove", FileStatus::Modified, "git", 3),
            ("/a/remove", FileStatus::Modified, "git", 3),
        ]);
        let new = make_index(&[
            ("/keep", FileStatus::Modified, "git", 1),
            ("/modify", FileStatus::Modified, "git", 4),
            ("/added", FileStatus::Added, "git", 0),
        ]);

        let delta = diff_snapshots(&old, &new);
        assert_eq!(delta.len(), 4);
        assert_eq!(
            delta.removed,
            vec![base("git", 3, "/a/remove"), base("git", 3, "/z/remove")]
        );
        assert_eq!(delta.added, vec![base("git", 0, "/added")]);
        assert_eq!(delta.modifications(), 1);
    }

    #[test]
    fn rename_then_refresh() {
        // First generation: file modified in place.
        let mut old = ChangeIndex::new(PathOrder::CASE_SENSITIVE);
        old.change_added(
            &Change::new(
                Some(ContentRevision::new("/src/a.rs", rev(3))),
                Some(ContentRevision::new("/src/a.rs", rev(3))),
            ),
            &vcs("git"),
        );

        // Second generation: the file is moved.
        let mut new = ChangeIndex::new(PathOrder::CASE_SENSITIVE);
        new.change_added(
            &Change::new(
                Some(ContentRevision::new("/src/a.rs", rev(3))),
                Some(ContentRevision::new("/src/b.rs", rev(3))),
            ),
            &vcs("git"),
        );

        let delta = diff_snapshots(&old, &new);
        // The old path is still tracked (as DELETED) at the same revision.
        assert!(delta.modified.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(delta.added, vec![base("git", 3, "/src/b.rs")]);
        assert_eq!(new.status_of(&p("/src/a.rs")), Some(FileStatus::Deleted));
    }

    #[test]
    fn mismatched_orders_are_rekeyed() {
        let mut old = ChangeIndex::new(PathOrder::CASE_INSENSITIVE);
        old.add(p("/Readme.md"), FileStatus::Modified, vcs("git"), rev(1));
        let mut new = ChangeIndex::new(PathOrder::CASE_SENSITIVE);
        new.add(p("/README.md"), FileStatus::Modified, vcs("git"), rev(1));

        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn delta_serializes_to_json() {
        let old = make_index(&[("/a", FileStatus::Modified, "git", 5)]);
        let new = make_index(&[("/a", FileStatus::Modified, "git", 6)]);
        let json = serde_json::to_value(diff_snapshots(&old, &new)).unwrap();
        assert_eq!(json["modified"][0]["before"]["revision"], 5);
        assert_eq!(json["modified"][0]["after"]["path"], "/a");
    }

    #[test]
    fn respelled_path_keeps_both_spellings() {
        let mut old = ChangeIndex::new(PathOrder::CASE_INSENSITIVE);
        old.add(p("/Readme.md"), FileStatus::Modified, vcs("git"), rev(1));
        let mut new = ChangeIndex::new(PathOrder::CASE_INSENSITIVE);
        new.add(p("/README.md"), FileStatus::Modified, vcs("git"), rev(2));

        let delta = diff_snapshots(&old, &new);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(
            delta.modified,
            vec![BeforeAfter::new(
                base("git", 1, "/Readme.md"),
                base("git", 2, "/README.md"),
            )]
        );
    }

    #[test]
    fn respelled_path_without_revision_change_is_quiet() {
        let mut old = ChangeIndex::new(PathOrder::CASE_INSENSITIVE);
        old.add(p("/Readme.md"), FileStatus::Modified, vcs("git"), rev(1));
        let mut new = ChangeIndex::new(PathOrder::CASE_INSENSITIVE);
        new.add(p("/README.md"), FileStatus::Added, vcs("git"), rev(1));

        assert!(diff_snapshots(&old, &new).is_empty());
    }

    #[test]
    fn trailing_separators_name_the_same_entry() {
        let old = make_index(&[("/a/b/", FileStatus::Modified, "git", 1)]);
        let same = make_index(&[("/a//b", FileStatus::Modified, "git", 1)]);
        assert!(diff_snapshots(&old, &same).is_empty());

        let bumped = make_index(&[("/a//b", FileStatus::Modified, "git", 2)]);
        let delta = diff_snapshots(&old, &bumped);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(
            delta.modified,
            vec![BeforeAfter::new(base("git", 1, "/a/b"), base("git", 2, "/a/b"))]
        );
    }

    fn arb_order() -> impl Strategy<Value = PathOrder> {
        prop_oneof![Just(PathOrder::CASE_SENSITIVE), Just(PathOrder::CASE_INSENSITIVE)]
    }

    fn arb_entries() -> impl Strategy<Value = Vec<(String, u64, bool)>> {
        prop::collection::vec(("/[aAbc]{1,2}(/[abC]{1,2})?/{0,2}", 0u64..3, prop::bool::ANY), 0..12)
    }

    fn build(order: PathOrder, items: Vec<(String, u64, bool)>) -> ChangeIndex {
        let mut idx = ChangeIndex::new(order);
        for (path, n, added) in items {
            let status = if added { FileStatus::Added } else { FileStatus::Modified };
            idx.add(p(&path), status, vcs("git"), rev(n));
        }
        idx
    }

    /// Two generations sharing one order.
    fn arb_pair() -> impl Strategy<Value = (ChangeIndex, ChangeIndex)> {
        arb_order().prop_flat_map(|order| {
            (arb_entries(), arb_entries())
                .prop_map(move |(old, new)| (build(order, old), build(order, new)))
        })
    }

    proptest! {
        #[test]
        fn partition_is_complete_and_disjoint((old, new) in arb_pair()) {
            let part = partition_paths(&old, &new);

            prop_assert!(part.removed.is_disjoint(&part.added));
            prop_assert!(part.removed.is_disjoint(&part.candidates));
            prop_assert!(part.added.is_disjoint(&part.candidates));

            let union: BTreeSet<&PathKey> = part
                .removed
                .iter()
                .chain(&part.added)
                .chain(&part.candidates)
                .copied()
                .collect();
            let all: BTreeSet<&PathKey> = old
                .entries()
                .chain(new.entries())
                .map(|(key, _)| key)
                .collect();
            prop_assert_eq!(union, all);
        }

        #[test]
        fn delta_reports_each_path_once((old, new) in arb_pair()) {
            let order = old.order();
            let delta = diff_snapshots(&old, &new);
            let mut seen = BTreeSet::new();
            for path in delta
                .removed
                .iter()
                .chain(&delta.added)
                .map(|b| &b.path)
                .chain(delta.modified.iter().map(|m| &m.after.path))
            {
                prop_assert!(seen.insert(order.key(path)));
            }
        }

        #[test]
        fn applying_delta_to_old_keys_yields_new_keys((old, new) in arb_pair()) {
            let order = old.order();
            let delta = diff_snapshots(&old, &new);
            let mut keys: BTreeSet<PathKey> = old.entries().map(|(key, _)| key.clone()).collect();
            for removed in &delta.removed {
                prop_assert!(keys.remove(&order.key(&removed.path)));
            }
            for added in &delta.added {
                prop_assert!(keys.insert(order.key(&added.path)));
            }
            let expected: BTreeSet<PathKey> = new.entries().map(|(key, _)| key.clone()).collect();
            prop_assert_eq!(keys, expected);
        }

        #[test]
        fn modified_iff_revision_differs((old, new) in arb_pair()) {
            let order = old.order();
            let delta = diff_snapshots(&old, &new);
            for (key, entry) in old.entries() {
                if let Some(after) = new.entry(key) {
                    let reported: Vec<_> = delta
                        .modified
                        .iter()
                        .filter(|m| &order.key(&m.before.path) == key)
                        .collect();
                    prop_assert_eq!(!reported.is_empty(), after.record.revision != entry.record.revision);
                    for m in reported {
                        prop_assert_eq!(&m.before.path, &entry.path);
                        prop_assert_eq!(&m.after.path, &after.path);
                    }
                }
            }
        }
    }
}
