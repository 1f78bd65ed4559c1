//! # Database Error Types
//!
//! Everything the storage layer can fail with, as one enum.
//!
//! Balance mutations run inside transactions, so any error surfaced from
//! the ledger engine means the transaction rolled back: callers must treat
//! a failed operation as having written nothing. Read paths additionally
//! apply the read-repair policy (corrupt rows are dropped, not errors), so
//! the variants here are about the store itself misbehaving, not about bad
//! rows.

use thiserror::Error;

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The customer or entry a mutation targets does not exist.
    ///
    /// Raised from inside the transaction, so nothing was written.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: String, id: String },

    /// A row with the same key already exists.
    #[error("duplicate value for {field}")]
    UniqueViolation { field: String },

    /// A referenced row is missing (foreign key rejected the write).
    #[error("invalid reference: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file could not be opened or the pool could not connect.
    /// Usually a path, permission, or disk problem.
    #[error("could not open database: {0}")]
    ConnectionFailed(String),

    /// A schema migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// A statement failed to execute.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A transaction could not begin or commit.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Every pooled connection is busy and the acquire timed out.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that has no better home above.
    #[error("database error: {0}")]
    Internal(String),
}

impl DbError {
    /// NotFound for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Classifies sqlx errors into the taxonomy above.
///
/// Constraint violations are classified by [`sqlx::error::ErrorKind`]
/// rather than by sniffing message text; the offending column for a unique
/// violation is still pulled from SQLite's message, which reads
/// `UNIQUE constraint failed: <table>.<column>`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::RowNotFound => DbError::not_found("row", "?"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    field: db_err
                        .message()
                        .rsplit(": ")
                        .next()
                        .unwrap_or("unknown")
                        .to_string(),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                DbError::ConnectionFailed("connection pool is closed".to_string())
            }

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = DbError::not_found("Customer", "7f3a");
        assert_eq!(err.to_string(), "Customer 7f3a does not exist");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
    }
}
