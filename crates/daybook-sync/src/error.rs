//! Error types for daybook-sync.

use std::path::PathBuf;
use std::time::Duration;

use daybook_core::CoreError;
use thiserror::Error;

/// Errors from opening and migrating the store.
///
/// Failures of individual remote calls are classified as
/// [`RemoteError`](crate::remote::RemoteError) instead and never escape a
/// reconciliation as a hard error.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid state encountered (e.g., bad data in the store).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Entity validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store did not answer within the configured timeout.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Local cache write failures. Always reported as warnings by callers.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cache replace of {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
