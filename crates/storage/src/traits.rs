//! Storage trait abstraction
//!
//! The migration runner only sees these traits, so tests substitute an
//! in-memory ledger for PostgreSQL.

use std::time::Duration;

use async_trait::async_trait;
use casebook_core::MigrationRecord;

use crate::error::StorageError;

/// Persistent ledger of applied migrations.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the ledger table if it does not exist. Idempotent.
    async fn ensure_ledger(&self) -> Result<(), StorageError>;

    /// All ledger rows, oldest first. A missing ledger reads as empty.
    async fn list_records(&self) -> Result<Vec<MigrationRecord>, StorageError>;

    /// Ledger names, oldest first.
    async fn list_applied(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.list_records().await?.into_iter().map(|record| record.name).collect())
    }

    /// Execute `body` and record `name`, atomically.
    ///
    /// With a `limit`, work still running when it expires is stopped on the
    /// database side and [`StorageError::Timeout`] is returned. On error
    /// neither effect is visible.
    async fn apply_migration(
        &self,
        name: &str,
        body: &str,
        limit: Option<Duration>,
    ) -> Result<(), StorageError>;

    /// Wait until the run lock is free and take it.
    async fn acquire_run_lock(&self) -> Result<Box<dyn RunLock>, StorageError>;
}

/// A held run lock.
///
/// Dropping it without calling [`RunLock::release`] still frees the lock,
/// so a cancelled run cannot keep later runs out.
#[async_trait]
pub trait RunLock: Send {
    /// Free the lock. Calling it again is a no-op.
    async fn release(&mut self) -> Result<(), StorageError>;
}
