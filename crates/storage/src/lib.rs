//! Storage layer for casebook migrations
//!
//! PostgreSQL ledger of applied migrations, plus the advisory lock that
//! keeps two runs from racing.

pub mod error;
mod pg_store;
pub mod traits;

pub use error::StorageError;
pub use pg_store::PgMigrationStore;
pub use traits::{MigrationStore, RunLock};
