use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown file status: {0}")]
    UnknownStatus(String),

    #[error("invalid vcs key: {0}")]
    InvalidVcsKey(String),

    #[error("change has neither a before nor an after revision")]
    EmptyChange,
}
