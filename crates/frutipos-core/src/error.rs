//! # Error Types
//!
//! Domain-specific error types for frutipos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  frutipos-core errors (this file)                                      │
//! │  ├── CoreError        - Stock and checkout rule violations             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  frutipos-db errors (separate crate)                                   │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → stderr       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant blocks only the operation that raised it. None of them is
//! produced after state has been modified.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the cart and checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(String),

    /// Sale cannot be found.
    #[error("Venta no encontrada: {0}")]
    SaleNotFound(String),

    /// The product has no units on hand.
    ///
    /// ## When This Occurs
    /// - Scanning a product whose stock is zero or negative
    #[error("{name} está agotado")]
    OutOfStock { name: String },

    /// Adding one more unit would exceed the stock on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan "Papaya" (stock: 2)  → qty 1
    /// Scan "Papaya"             → qty 2
    /// Scan "Papaya"             → InsufficientStock { available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// Cart unchanged, operator sees "Stock insuficiente para Papaya"
    /// ```
    #[error("Stock insuficiente para {name}: disponible {available}, solicitado {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A quantity adjustment would leave the line outside `1..=stock`.
    #[error("La cantidad {requested} de {name} debe estar entre 1 y {max}")]
    QuantityOutOfRange {
        name: String,
        requested: i64,
        max: i64,
    },

    /// The product is not in the cart.
    #[error("El producto {0} no está en el pedido")]
    NotInCart(String),

    /// Checkout attempted with no lines.
    #[error("El pedido está vacío")]
    EmptyCart,

    /// A client email was given without the data-processing authorization.
    #[error("El cliente debe autorizar el tratamiento de datos antes de enviarle la factura")]
    ConsentRequired,

    /// A line or order total does not fit in the money range.
    #[error("El monto del pedido es demasiado grande")]
    AmountTooLarge,

    /// Validation error (wraps ValidationError).
    #[error("Dato inválido: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} es obligatorio")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} admite máximo {max} caracteres")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} debe estar entre {min} y {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} debe ser mayor que cero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} no puede ser negativo")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} tiene un formato inválido: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} debe ser uno de: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Papaya".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Stock insuficiente para Papaya: disponible 2, solicitado 3"
        );
        assert_eq!(CoreError::EmptyCart.to_string(), "El pedido está vacío");
        assert_eq!(
            CoreError::ConsentRequired.to_string(),
            "El cliente debe autorizar el tratamiento de datos antes de enviarle la factura"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("código").to_string(), "código es obligatorio");

        let err = ValidationError::MustBePositive {
            field: "precio".to_string(),
        };
        assert_eq!(err.to_string(), "precio debe ser mayor que cero");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("nombre").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
