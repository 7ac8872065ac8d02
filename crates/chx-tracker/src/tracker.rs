//! The generation holder.
//!
//! Readers get an `Arc` to the current generation and never observe a
//! half-built one: a generation is only reachable after [`ChangeTracker::publish`]
//! has moved it behind an `Arc`, at which point nothing can mutate it.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use chx_diff::{diff_snapshots, SnapshotDelta};
use chx_index::{ChangeIndex, IndexConfig};
use chx_types::{Change, FileStatus, VcsKey, VcsPath};
use tracing::{debug, info};

use crate::error::{TrackerError, TrackerResult};
use crate::listener::DeltaListener;

/// Outcome of a publish.
#[derive(Clone, Debug)]
pub struct Published {
    /// Number of the generation that was just published. The first publish
    /// yields generation 1; generation 0 is the initial empty index.
    pub generation: u64,
    /// Delta from the replaced generation to the published one.
    pub delta: Arc<SnapshotDelta>,
}

struct Current {
    generation: u64,
    index: Arc<ChangeIndex>,
}

/// Holds the current published generation and fans deltas out to listeners.
pub struct ChangeTracker {
    config: IndexConfig,
    current: RwLock<Current>,
    listeners: RwLock<Vec<Arc<dyn DeltaListener>>>,
    // Held across swap, diff and notify so listeners see generations in order.
    publishing: Mutex<()>,
}

impl ChangeTracker {
    /// Create a tracker whose initial generation is empty.
    pub fn new(config: IndexConfig) -> Self {
        let index = Arc::new(ChangeIndex::with_config(&config));
        Self {
            config,
            current: RwLock::new(Current {
                generation: 0,
                index,
            }),
            listeners: RwLock::new(Vec::new()),
            publishing: Mutex::new(()),
        }
    }

    /// The configuration new generations are built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// An empty index to populate as the next generation.
    pub fn begin(&self) -> ChangeIndex {
        ChangeIndex::with_config(&self.config)
    }

    /// A private copy of the current generation to edit into the next one.
    pub fn fork(&self) -> TrackerResult<ChangeIndex> {
        Ok(self.snapshot()?.as_ref().clone())
    }

    /// The current generation.
    pub fn snapshot(&self) -> TrackerResult<Arc<ChangeIndex>> {
        let current = self.current.read().map_err(poisoned)?;
        Ok(Arc::clone(&current.index))
    }

    /// Number of the current generation.
    pub fn generation(&self) -> TrackerResult<u64> {
        let current = self.current.read().map_err(poisoned)?;
        Ok(current.generation)
    }

    /// Register a listener for future deltas.
    pub fn subscribe(&self, listener: Arc<dyn DeltaListener>) -> TrackerResult<()> {
        let mut listeners = self.listeners.write().map_err(poisoned)?;
        listeners.push(listener);
        debug!(listeners = listeners.len(), "delta listener registered");
        Ok(())
    }

    /// Freeze `next`, make it the current generation, and report what changed.
    ///
    /// Publishes are serialized: concurrent callers each get the delta against
    /// the generation they replaced, and listeners receive deltas in
    /// generation order. Readers are only blocked for the swap itself.
    ///
    /// The replaced generation is dropped once the delta has been delivered
    /// (readers still holding it keep it alive).
    pub fn publish(&self, next: ChangeIndex) -> TrackerResult<Published> {
        let _publishing = self.publishing.lock().map_err(poisoned)?;
        let next = Arc::new(next);
        let (generation, previous) = {
            let mut current = self.current.write().map_err(poisoned)?;
            current.generation += 1;
            let previous = std::mem::replace(&mut current.index, Arc::clone(&next));
            (current.generation, previous)
        };

        let delta = Arc::new(diff_snapshots(&previous, &next));
        info!(
            generation,
            paths = next.len(),
            removed = delta.removals(),
            added = delta.additions(),
            modified = delta.modifications(),
            "published change index generation"
        );

        let listeners: Vec<Arc<dyn DeltaListener>> = {
            let listeners = self.listeners.read().map_err(poisoned)?;
            listeners.clone()
        };
        for listener in &listeners {
            listener.on_delta(generation, &delta);
        }

        drop(previous);
        Ok(Published { generation, delta })
    }

    /// Status of `path` in the current generation.
    pub fn status_of(&self, path: &VcsPath) -> TrackerResult<Option<FileStatus>> {
        Ok(self.snapshot()?.status_of(path))
    }

    /// Owner of `change` in the current generation.
    pub fn owner_of(&self, change: &Change) -> TrackerResult<Option<VcsKey>> {
        Ok(self.snapshot()?.owner_of(change).cloned())
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("ChangeTracker")
            .field("config", &self.config)
            .field("listeners", &listeners)
            .finish_non_exhaustive()
    }
}

fn poisoned<E: fmt::Display>(e: E) -> TrackerError {
    TrackerError::LockPoisoned(e.to_string())
}
