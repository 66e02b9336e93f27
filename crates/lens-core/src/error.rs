//! Error types for lens-core

use thiserror::Error;

/// Result type alias for lens-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for object store operations
#[derive(Error, Debug)]
pub enum Error {
    /// The backing store failed to list or read
    #[error("Store error: {0}")]
    Store(String),

    /// A key was requested that the store does not hold
    #[error("Object not found: {0}")]
    ObjectMissing(String),

    /// A partition label is not a `YYYY-MM-DD` date
    #[error("Invalid partition label: {0}")]
    InvalidPartition(String),

    /// Filesystem error from a local store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
