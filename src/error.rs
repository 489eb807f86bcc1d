//! Error types for bucketrepo
//!
//! Provides a unified error type for all repository operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using RepoError
pub type Result<T> = std::result::Result<T, RepoError>;

/// Unified error type for repository operations
#[derive(Debug, Error)]
pub enum RepoError {
    // -------------------------------------------------------------------------
    // I/O and Engine Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("Timed out after {waited:?} waiting for lock on {}", .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Bucket {0:?} not found")]
    BucketNotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Iteration Errors
    // -------------------------------------------------------------------------
    #[error("Visitor failed at key {key:?}: {source}")]
    Visitor {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// redb splits its failures into one type per stage; fold them all into
// `Storage` so `?` works inside transaction bodies.
macro_rules! storage_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RepoError {
                fn from(err: $ty) -> Self {
                    RepoError::Storage(redb::Error::from(err))
                }
            }
        )*
    };
}

storage_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
