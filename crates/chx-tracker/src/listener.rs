use chx_diff::SnapshotDelta;

/// Receives the delta of every published generation.
///
/// Listeners run synchronously on the publishing thread, after the new
/// generation has been swapped in.
pub trait DeltaListener: Send + Sync {
    fn on_delta(&self, generation: u64, delta: &SnapshotDelta);
}

impl<F> DeltaListener for F
where
    F: Fn(u64, &SnapshotDelta) + Send + Sync,
{
    fn on_delta(&self, generation: u64, delta: &SnapshotDelta) {
        self(generation, delta)
    }
}
