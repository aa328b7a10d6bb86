//! Error types for stripclust-core.

use crate::digit::Side;
use thiserror::Error;

/// Result type alias for stripclust operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for stripclust operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Module geometry with non-physical parameters.
    #[error("invalid module geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The geometry provider has no entry for this module.
    #[error("no geometry for module {0}")]
    UnknownModule(u32),

    /// Cluster lookup past the end of a side's cluster list.
    #[error("{side} side cluster index {index} out of range (have {len})")]
    IndexOutOfRange {
        /// Side that was queried.
        side: Side,
        /// Requested index.
        index: usize,
        /// Number of clusters on that side.
        len: usize,
    },
}
