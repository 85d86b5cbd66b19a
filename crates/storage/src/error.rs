//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (duplicate ledger row, apply
//! timeout) instead of downcasting opaque boxes.

use std::time::Duration;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Unique constraint violation (ledger row already present).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL / connection / timeout failure, including errors raised by a
    /// migration body.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A migration did not finish within its limit and was cancelled on the
    /// server; its transaction rolled back.
    #[error("cancelled after {0:?}")]
    Timeout(Duration),
}

impl StorageError {
    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Custom `From<sqlx::Error>` so SQLSTATE 23505 surfaces as `Duplicate`.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23505") => {
                Self::Duplicate(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}

/// SQLSTATE 42P01: the queried relation does not exist.
pub(crate) fn is_undefined_table(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "42P01"))
}

/// SQLSTATE 57014: statement cancelled (`statement_timeout` or
/// `pg_cancel_backend`).
pub(crate) fn is_query_canceled(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "57014"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_plain_database_error() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::Database(sqlx::Error::RowNotFound)));
        assert!(!err.is_duplicate());
        assert!(!is_undefined_table(&sqlx::Error::RowNotFound));
        assert!(!is_query_canceled(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn timeout_message_names_limit() {
        let err = StorageError::Timeout(Duration::from_millis(300));
        assert_eq!(err.to_string(), "cancelled after 300ms");
    }
}
