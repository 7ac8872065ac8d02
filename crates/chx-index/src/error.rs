//! Error types for the index crate.
//!
//! Index operations themselves are total; only configuration loading can fail.

/// Errors that can occur while configuring an index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The configuration could not be parsed.
    #[error("invalid index config: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
