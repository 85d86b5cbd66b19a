//! Session-level advisory lock serialising migration runs across processes.
//!
//! The lock lives on a connection detached from the pool. Releasing it, or
//! dropping the holder, closes that session, and PostgreSQL frees every
//! session lock when a session ends.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use super::PgMigrationStore;
use crate::error::StorageError;
use crate::traits::RunLock;

/// Advisory lock held by one PostgreSQL session.
pub struct PgRunLock {
    key: i64,
    conn: Option<PgConnection>,
}

impl PgMigrationStore {
    pub(super) async fn lock_run(&self) -> Result<PgRunLock, StorageError> {
        // Detached before locking: if this future is dropped mid-wait, the
        // session goes away with it instead of going back to the pool.
        let mut conn = self.pool.acquire().await?.detach();
        tracing::debug!(key = self.lock_key, "waiting for migration advisory lock");
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(self.lock_key)
            .execute(&mut conn)
            .await?;
        tracing::debug!(key = self.lock_key, "migration advisory lock taken");
        Ok(PgRunLock { key: self.lock_key, conn: Some(conn) })
    }
}

#[async_trait]
impl RunLock for PgRunLock {
    async fn release(&mut self) -> Result<(), StorageError> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };

        let unlocked: Result<bool, sqlx::Error> =
            sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
                .bind(self.key)
                .fetch_one(&mut conn)
                .await;

        // Closing ends the session, which frees the lock even if the unlock
        // query failed.
        if let Err(err) = conn.close().await {
            tracing::warn!(key = self.key, error = %err, "failed to close lock connection");
        }

        match unlocked {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(key = self.key, "advisory lock was not held at release");
                Ok(())
            },
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for PgRunLock {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            tracing::warn!(key = self.key, "run lock dropped without release; session closed");
        }
    }
}

impl std::fmt::Debug for PgRunLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRunLock")
            .field("key", &self.key)
            .field("held", &self.conn.is_some())
            .finish()
    }
}
