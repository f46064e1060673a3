//! # CLI Error Types
//!
//! Every library error is converted into an `AppError` before it reaches
//! the operator.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Error Flow                                       │
//! │                                                                         │
//! │  frutipos-core          frutipos-db            CLI                     │
//! │  ─────────────          ───────────            ───                     │
//! │  ValidationError ──┐                                                   │
//! │  CoreError ────────┼──► DbError ──────────────► AppError               │
//! │                    └──────────────────────────►  { code, message }     │
//! │                                                        │               │
//! │  std::io / toml ──────────────────────────────────────►│               │
//! │                                                        ▼               │
//! │                                   stderr: "[NotFound] Product not ..." │
//! │                                   exit status: 1                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside the register session an error is printed and the session goes on;
//! everywhere else it ends the command.

use frutipos_core::{CoreError, ValidationError};
use frutipos_db::DbError;
use serde::Serialize;

/// Error shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for categorizing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, sale or cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Stock rule violated
    InsufficientStock,

    /// Cart or checkout rule violated
    CartError,

    /// Store operation failed
    DatabaseError,

    /// Settings file could not be read
    ConfigError,

    /// Terminal or file I/O failed
    IoError,

    /// Internal error
    Internal,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("No se encontró {} {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a settings error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::Rule(e) => AppError::from(e),
            DbError::Invalid(e) => AppError::from(e),
            DbError::Serialization(e) => {
                tracing::error!("Collection encoding failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "No se pudieron codificar los datos")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "No se pudo conectar a la base de datos")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "No se pudo actualizar la base de datos")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Falló la operación en la base de datos")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Falló la transacción, no se guardó nada")
            }
            DbError::PoolExhausted => AppError::new(ErrorCode::DatabaseError, "La base de datos está ocupada"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Falló la operación en la base de datos")
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("el producto", &id),
            CoreError::SaleNotFound(id) => AppError::not_found("la venta", &id),
            e @ (CoreError::OutOfStock { .. } | CoreError::InsufficientStock { .. }) => {
                AppError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ (CoreError::QuantityOutOfRange { .. }
            | CoreError::NotInCart(_)
            | CoreError::EmptyCart
            | CoreError::ConsentRequired
            | CoreError::AmountTooLarge) => AppError::new(ErrorCode::CartError, e.to_string()),
            CoreError::Validation(e) => AppError::from(e),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Archivo de ajustes inválido: {}", err.message()))
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Convenience type alias for command results.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_errors_map_to_insufficient_stock() {
        let err = AppError::from(CoreError::InsufficientStock {
            name: "Papaya".to_string(),
            available: 2,
            requested: 3,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Papaya"));
    }

    #[test]
    fn test_db_rule_unwraps_to_core_mapping() {
        let err = AppError::from(DbError::Rule(CoreError::EmptyCart));
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "El pedido está vacío");
    }

    #[test]
    fn test_not_found_display() {
        let err = AppError::from(DbError::not_found("el producto", "42"));
        assert_eq!(err.to_string(), "[NotFound] No se encontró el producto 42");
    }

    #[test]
    fn test_operator_messages_are_spanish() {
        let err = AppError::from(CoreError::ConsentRequired);
        assert_eq!(err.code, ErrorCode::CartError);
        assert!(err.message.starts_with("El cliente debe autorizar"));

        let err = AppError::from(CoreError::AmountTooLarge);
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "El monto del pedido es demasiado grande");
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err = AppError::from(DbError::QueryFailed("no such table: collections".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("collections"));
    }
}
