//! Shared constants for casebook.

/// File extension a directory entry must carry to count as a migration.
pub const SQL_EXTENSION: &str = ".sql";

/// Migration directory used when neither the CLI nor the environment names one.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Upper bound on a single migration apply, in seconds. `0` disables the bound.
pub const DEFAULT_MIGRATION_TIMEOUT_SECS: u64 = 300;

/// Key for the session-level advisory lock that serialises migration runs.
/// Arbitrary, but must stay stable across releases.
pub const MIGRATION_LOCK_KEY: i64 = 0x6361_7365_626f_6f6b;

/// PostgreSQL connection pool: default maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Environment variable holding the PostgreSQL connection URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable overriding [`DEFAULT_MIGRATIONS_DIR`].
pub const ENV_MIGRATIONS_DIR: &str = "CASEBOOK_MIGRATIONS_DIR";

/// Environment variable overriding [`DEFAULT_MIGRATION_TIMEOUT_SECS`].
pub const ENV_MIGRATION_TIMEOUT_SECS: &str = "CASEBOOK_MIGRATION_TIMEOUT_SECS";

/// Environment variable overriding [`PG_POOL_MAX_CONNECTIONS`].
pub const ENV_PG_MAX_CONNECTIONS: &str = "CASEBOOK_PG_MAX_CONNECTIONS";
