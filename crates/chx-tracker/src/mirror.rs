//! A listener that keeps a copy of the tracked base revisions.
//!
//! This is the shape of a downstream cache (annotations, remote revisions):
//! it never sees a generation, only deltas, and must still end up holding
//! exactly the base revisions of the current generation.
//!
//! Equality is per index key. A path respelled without a revision change
//! (`/Readme.md` -> `/README.md` under a case-insensitive order) produces no
//! delta, so the mirror keeps the spelling it last saw for that key.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chx_diff::SnapshotDelta;
use chx_index::{ChangeIndex, PathKey, PathOrder};
use chx_types::BaseRevision;
use tracing::warn;

use crate::listener::DeltaListener;

/// Maintains the set of base revisions by applying deltas.
#[derive(Debug)]
pub struct RevisionMirror {
    order: PathOrder,
    revisions: Mutex<BTreeMap<PathKey, BaseRevision>>,
}

impl RevisionMirror {
    /// Create an empty mirror keyed by `order`, which should match the order
    /// of the tracked generations.
    pub fn new(order: PathOrder) -> Self {
        Self {
            order,
            revisions: Mutex::new(BTreeMap::new()),
        }
    }

    /// The mirrored revisions in path order.
    pub fn revisions(&self) -> Vec<BaseRevision> {
        match self.revisions.lock() {
            Ok(revisions) => revisions.values().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().values().cloned().collect(),
        }
    }

    /// The mirrored revisions by index key.
    pub fn revisions_by_key(&self) -> BTreeMap<PathKey, BaseRevision> {
        match self.revisions.lock() {
            Ok(revisions) => revisions.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns `true` if the mirror tracks the same keys as `index`, each with
    /// the same owner and revision and a path equal for indexing.
    pub fn matches(&self, index: &ChangeIndex) -> bool {
        let mirrored = self.revisions_by_key();
        let order = index.order();
        mirrored.len() == index.len()
            && index.iter().all(|entry| match mirrored.get(&self.order.key(&entry.path)) {
                Some(base) => {
                    base.owner == entry.record.owner
                        && base.revision == entry.record.revision
                        && order.same_path(&base.path, &entry.path)
                }
                None => false,
            })
    }

    fn apply(&self, revisions: &mut BTreeMap<PathKey, BaseRevision>, delta: &SnapshotDelta) {
        for removed in &delta.removed {
            revisions.remove(&self.order.key(&removed.path));
        }
        for added in &delta.added {
            revisions.insert(self.order.key(&added.path), added.clone());
        }
        for modified in &delta.modified {
            revisions.insert(self.order.key(&modified.after.path), modified.after.clone());
        }
    }
}

impl DeltaListener for RevisionMirror {
    fn on_delta(&self, generation: u64, delta: &SnapshotDelta) {
        match self.revisions.lock() {
            Ok(mut revisions) => self.apply(&mut revisions, delta),
            Err(poisoned) => {
                warn!(generation, "revision mirror lock poisoned; applying anyway");
                self.apply(&mut poisoned.into_inner(), delta);
            }
        }
    }
}
