use std::path::PathBuf;
use std::time::Duration;

use casebook_core::{
    DEFAULT_MIGRATION_TIMEOUT_SECS, DEFAULT_MIGRATIONS_DIR, ENV_MIGRATION_TIMEOUT_SECS,
    ENV_MIGRATIONS_DIR, ENV_PG_MAX_CONNECTIONS, PG_POOL_MAX_CONNECTIONS, env_parse_with_default,
    env_string_with_default, env_timeout_secs,
};

/// Runner settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub migrations_dir: PathBuf,
    /// `None` lets an apply run for as long as the database takes.
    pub apply_timeout: Option<Duration>,
    pub max_connections: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            apply_timeout: Some(Duration::from_secs(DEFAULT_MIGRATION_TIMEOUT_SECS)),
            max_connections: PG_POOL_MAX_CONNECTIONS,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self {
            migrations_dir: PathBuf::from(env_string_with_default(
                ENV_MIGRATIONS_DIR,
                DEFAULT_MIGRATIONS_DIR,
            )),
            apply_timeout: env_timeout_secs(
                ENV_MIGRATION_TIMEOUT_SECS,
                DEFAULT_MIGRATION_TIMEOUT_SECS,
            ),
            max_connections: env_parse_with_default(
                ENV_PG_MAX_CONNECTIONS,
                PG_POOL_MAX_CONNECTIONS,
            ),
        }
    }

    #[must_use]
    pub fn with_migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }
}
