//! PostgreSQL migration store using sqlx.
//!
//! Split into ledger queries and the advisory run lock.

mod ledger;
mod run_lock;

use std::time::Duration;

use casebook_core::{MIGRATION_LOCK_KEY, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StorageError;

/// Ledger store over a pool shared with the rest of the application.
pub struct PgMigrationStore {
    pool: PgPool,
    /// Advisory lock key shared by every runner migrating this database.
    lock_key: i64,
}

impl PgMigrationStore {
    /// Wrap a pool owned by the caller.
    pub fn new(pool: PgPool) -> Self {
        Self { pool, lock_key: MIGRATION_LOCK_KEY }
    }

    /// Open a new pool and wrap it.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        tracing::info!(max_connections, "PgMigrationStore connected");
        Ok(Self::new(pool))
    }

    /// Use a different advisory lock key, for applications that share one
    /// database but migrate independently.
    #[must_use]
    pub fn with_lock_key(mut self, key: i64) -> Self {
        self.lock_key = key;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl std::fmt::Debug for PgMigrationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgMigrationStore")
            .field("pool", &self.pool)
            .field("lock_key", &self.lock_key)
            .finish()
    }
}
