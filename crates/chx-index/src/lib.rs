//! Hierarchical change index.
//!
//! Tracks, for a set of paths, the latest known change record (status,
//! owning backend, base revision). The map is ordered hierarchically so that
//! a directory always precedes its descendants and a subtree is a contiguous
//! range.
//!
//! # Key Types
//!
//! - [`ChangeIndex`] -- One generation of the path -> record map
//! - [`PathOrder`] / [`PathKey`] -- Hierarchy-aware ordering with configurable case sensitivity
//! - [`IndexConfig`] -- Index settings, loadable from TOML

pub mod config;
pub mod error;
pub mod index;
pub mod order;

pub use config::IndexConfig;
pub use error::{IndexError, IndexResult};
pub use index::{ChangeIndex, IndexEntry};
pub use order::{CaseSensitivity, PathKey, PathOrder};
