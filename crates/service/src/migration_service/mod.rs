//! The migration runner.
//!
//! Brings the ledger into agreement with the migration directory: every file
//! not yet recorded is applied once, in lexical file-name order. A failing
//! file does not stop later files from being attempted; the run still fails
//! at the end. Files are assumed independent enough for that to be safe.


use std::sync::Arc;
use std::time::Duration;

use casebook_core::{
    MigrationFile, MigrationRecord, RunSummary, StatusReport, collect_migration_files,
    pending_files,
};
use casebook_storage::{MigrationStore, StorageError};
use tokio::sync::Mutex;

use crate::config::RunnerConfig;
use crate::error::{ApplyError, MigrationError};
use crate::source::{DirSource, MigrationSource};

pub struct MigrationService {
    store: Arc<dyn MigrationStore>,
    source: Arc<dyn MigrationSource>,
    apply_timeout: Option<Duration>,
    /// Serialises `run()` within this process; the store lock covers other processes.
    run_guard: Mutex<()>,
}

impl MigrationService {
    #[must_use]
    pub fn new(store: Arc<dyn MigrationStore>, source: Arc<dyn MigrationSource>) -> Self {
        Self { store, source, apply_timeout: None, run_guard: Mutex::new(()) }
    }

    /// Runner over `config.migrations_dir` with the configured timeout.
    #[must_use]
    pub fn from_config(store: Arc<dyn MigrationStore>, config: &RunnerConfig) -> Self {
        Self::new(store, Arc::new(DirSource::new(config.migrations_dir.clone())))
            .with_apply_timeout(config.apply_timeout)
    }

    #[must_use]
    pub fn with_apply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.apply_timeout = timeout;
        self
    }

    pub async fn ensure_ledger(&self) -> Result<(), MigrationError> {
        Ok(self.store.ensure_ledger().await?)
    }

    /// Applied names, in the order they were applied.
    pub async fn list_applied(&self) -> Result<Vec<String>, MigrationError> {
        Ok(self.store.list_applied().await?)
    }

    pub async fn list_records(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        Ok(self.store.list_records().await?)
    }

    /// Migration files on disk, sorted by file name.
    pub async fn list_available(&self) -> Result<Vec<MigrationFile>, MigrationError> {
        let entries = self.source.list_entries().await?;
        Ok(collect_migration_files(entries))
    }

    /// Apply one migration. Failures are logged and reported as `false`.
    pub async fn apply_one(&self, name: &str, body: &str) -> bool {
        match self.try_apply(name, body).await {
            Ok(()) => {
                tracing::info!(migration = name, "applied migration");
                true
            },
            Err(err) => {
                tracing::error!(migration = name, error = %err, "migration failed");
                false
            },
        }
    }

    async fn try_apply(&self, name: &str, body: &str) -> Result<(), ApplyError> {
        if body.trim().is_empty() {
            return Err(ApplyError::EmptyBody);
        }
        match self.store.apply_migration(name, body, self.apply_timeout).await {
            Ok(()) => Ok(()),
            Err(StorageError::Timeout(limit)) => Err(ApplyError::Timeout { limit }),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply every pending migration.
    ///
    /// Concurrent calls queue behind one another. On failure the error
    /// carries both counts; migrations that applied stay applied. Dropping
    /// the returned future part way frees the run lock.
    pub async fn run(&self) -> Result<RunSummary, MigrationError> {
        let _serial = self.run_guard.lock().await;
        let mut lock = self.store.acquire_run_lock().await?;

        let outcome = self.run_locked().await;

        if let Err(err) = lock.release().await {
            tracing::warn!(error = %err, "failed to release migration run lock");
        }

        let summary = outcome?;
        if summary.failed > 0 {
            return Err(MigrationError::RunFailed {
                applied: summary.applied,
                failed: summary.failed,
            });
        }
        Ok(summary)
    }

    async fn run_locked(&self) -> Result<RunSummary, MigrationError> {
        self.ensure_ledger().await?;
        let applied = self.list_applied().await?;
        let available = self.list_available().await?;
        let pending = pending_files(&applied, &available);

        tracing::info!(
            available = available.len(),
            pending = pending.len(),
            "starting migration run"
        );

        let mut summary = RunSummary::default();
        for file in pending {
            let body = self.source.read_text(&file.file_name).await?;
            if self.apply_one(&file.name, &body).await {
                summary.applied += 1;
            } else {
                summary.failed += 1;
            }
        }

        tracing::info!(
            applied = summary.applied,
            failed = summary.failed,
            "migration run finished"
        );
        Ok(summary)
    }

    /// Compare the ledger with the directory without changing either.
    pub async fn status(&self) -> Result<StatusReport, MigrationError> {
        let applied = self.list_applied().await?;
        let available = self.list_available().await?;
        Ok(StatusReport::new(applied, &available))
    }
}
