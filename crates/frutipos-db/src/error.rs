//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      Domain rule (CoreError)               │
//! │       │                                 │                               │
//! │       └──────────────┬──────────────────┘                               │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in CLI) ← Code + message for the operator                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use frutipos_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a product id that is not in the catalog
    /// - Looking up a sale id that was never committed
    #[error("No se encontró {entity} {id}")]
    NotFound { entity: String, id: String },

    /// A domain rule rejected the write. Nothing was persisted.
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// Input failed validation. Nothing was persisted.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A collection could not be encoded as JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be committed. No write took effect.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("el producto", "42");
        assert_eq!(err.to_string(), "No se encontró el producto 42");
    }

    #[test]
    fn test_rule_errors_keep_their_message() {
        let err: DbError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "El pedido está vacío");
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
    }
}
