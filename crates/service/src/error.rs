//! Typed errors for the migration runner.
//!
//! `ApplyError` is per file and never escapes a run; it is logged and
//! counted. `MigrationError` is what `run()` and `status()` return.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use casebook_storage::StorageError;
use thiserror::Error;

/// Listing or reading migration files failed.
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("cannot list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single migration did not apply.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Body is empty or whitespace only.
    #[error("migration body is empty")]
    EmptyBody,

    /// SQL execution or the ledger insert failed; the transaction rolled back.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Apply did not finish in time; it was cancelled and rolled back.
    #[error("timed out after {limit:?}")]
    Timeout { limit: Duration },
}

/// Run-level error.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Ledger bootstrap, ledger read, or run lock failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Migration files could not be listed or read. No further files were
    /// attempted.
    #[error("file system: {0}")]
    FileSystem(#[from] FileSystemError),

    /// The loop finished but some migrations failed. Those that applied stay
    /// committed.
    #[error("{failed} migration(s) failed, {applied} applied")]
    RunFailed { applied: usize, failed: usize },
}
