//! MigrationStore implementation for PgMigrationStore.

use std::time::Duration;

use async_trait::async_trait;
use casebook_core::MigrationRecord;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres, Row, Transaction};

use super::PgMigrationStore;
use crate::error::{StorageError, is_query_canceled, is_undefined_table};
use crate::traits::{MigrationStore, RunLock};

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn ensure_ledger(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS migrations (
                id SERIAL PRIMARY KEY,
                migration_name TEXT NOT NULL UNIQUE,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        tracing::debug!("migration ledger ready");
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<MigrationRecord>, StorageError> {
        let rows = sqlx::query(
            "SELECT migration_name, applied_at FROM migrations ORDER BY applied_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await;
        let rows = match rows {
            Ok(rows) => rows,
            Err(err) if is_undefined_table(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        rows.iter()
            .map(|row| -> Result<MigrationRecord, StorageError> {
                let applied_at: DateTime<Utc> = row.try_get("applied_at")?;
                Ok(MigrationRecord { name: row.try_get("migration_name")?, applied_at })
            })
            .collect()
    }

    async fn apply_migration(
        &self,
        name: &str,
        body: &str,
        limit: Option<Duration>,
    ) -> Result<(), StorageError> {
        // Dropping `tx` on any early return rolls both statements back.
        let mut tx = self.pool.begin().await?;
        let Some(limit) = limit else {
            execute_and_record(&mut tx, name, body).await?;
            tx.commit().await?;
            return Ok(());
        };

        let backend_pid: i32 =
            sqlx::query_scalar("SELECT pg_backend_pid()").fetch_one(&mut *tx).await?;
        // Server-side bound in case the cancel below cannot be delivered.
        let limit_ms = limit.as_millis().max(1);
        sqlx::query(&format!("SET LOCAL statement_timeout = {limit_ms}"))
            .execute(&mut *tx)
            .await?;

        let outcome = tokio::time::timeout(limit, execute_and_record(&mut tx, name, body)).await;
        match outcome {
            Ok(Ok(())) => {
                tx.commit().await?;
                Ok(())
            },
            Ok(Err(err)) if is_query_canceled(&err) => {
                roll_back_after_timeout(tx, name).await;
                Err(StorageError::Timeout(limit))
            },
            Ok(Err(err)) => Err(err.into()),
            Err(_) => {
                self.cancel_backend(backend_pid).await;
                roll_back_after_timeout(tx, name).await;
                Err(StorageError::Timeout(limit))
            },
        }
    }

    async fn acquire_run_lock(&self) -> Result<Box<dyn RunLock>, StorageError> {
        Ok(Box::new(self.lock_run().await?))
    }
}

async fn execute_and_record(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    body: &str,
) -> Result<(), sqlx::Error> {
    (&mut **tx).execute(sqlx::raw_sql(body)).await?;
    sqlx::query("INSERT INTO migrations (migration_name) VALUES ($1)")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Waits for a cancelled statement to finish, then ends the transaction so
/// none of its locks outlive the apply.
async fn roll_back_after_timeout(tx: Transaction<'_, Postgres>, name: &str) {
    if let Err(err) = tx.rollback().await {
        tracing::warn!(migration = name, error = %err, "rollback after timeout failed");
    }
}

impl PgMigrationStore {
    async fn cancel_backend(&self, pid: i32) {
        let cancelled = sqlx::query_scalar::<_, bool>("SELECT pg_cancel_backend($1)")
            .bind(pid)
            .fetch_one(&self.pool)
            .await;
        match cancelled {
            Ok(sent) => tracing::debug!(pid, sent, "cancelled timed-out migration statement"),
            Err(err) => tracing::warn!(pid, error = %err, "failed to cancel migration statement"),
        }
    }
}
