//! Error types for the tracker crate.

use thiserror::Error;

/// Errors that can occur while publishing or reading generations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A lock was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for tracker operations.
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
