//! # Validation Module
//!
//! Input coercion and validation for FrutiPOS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Shape only: which flags, which subcommand                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Drafts (ProductDraft, ExpenseDraft)                          │
//! │  ├── Numeric coercion: non-numeric input becomes 0                     │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Persists only records that passed layer 2                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use frutipos_core::validation::{coerce_money, validate_price};
//! use frutipos_core::Money;
//!
//! let price = coerce_money("1500");
//! assert_eq!(price, Money::from_pesos(1500));
//! assert!(validate_price(price).is_ok());
//!
//! // Garbage coerces to zero, and zero is not a valid price
//! assert!(validate_price(coerce_money("abc")).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MAX_UNIT_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Coercion
// =============================================================================

/// Parses a peso amount typed by the operator. Anything that is not a
/// finite number becomes zero.
pub fn coerce_money(input: &str) -> Money {
    Money::parse_pesos(input).unwrap_or_default()
}

/// Parses a unit count. Fractions are truncated, anything non-numeric
/// becomes zero.
pub fn coerce_quantity(input: &str) -> i64 {
    let input = input.trim();
    if let Ok(n) = input.parse::<i64>() {
        return n;
    }
    match input.replace(',', ".").parse::<f64>() {
        Ok(n) if n.is_finite() => n.trunc() as i64,
        _ => 0,
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use frutipos_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Manzana Roja").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("nombre"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters, no whitespace inside
///
/// Barcodes are not required to be unique; scanning resolves to the first
/// match in catalog order.
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::required("código"));
    }

    if barcode.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "código".to_string(),
            max: 50,
        });
    }

    if barcode.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "código".to_string(),
            reason: "no debe contener espacios".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "búsqueda".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an expense description.
pub fn validate_expense_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::required("descripción"));
    }

    if description.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "descripción".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates the store name in the configuration.
pub fn validate_store_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("nombre de la tienda"));
    }
    Ok(())
}

/// Validates a client email address.
///
/// ## Rules
/// - Shape `local@domain.tld`
/// - No whitespace, exactly one `@`
///
/// ## Example
/// ```rust
/// use frutipos_core::validation::validate_email;
///
/// assert!(validate_email("cliente@correo.co").is_ok());
/// assert!(validate_email("cliente@correo").is_err());
/// assert!(validate_email("@correo.co").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "correo".to_string(),
        reason: reason.to_string(),
    };

    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required("correo"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("no debe contener espacios"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("falta la @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("se esperaba usuario@dominio"));
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !host.starts_with('.') => Ok(()),
        _ => Err(invalid("el dominio debe ser como ejemplo.com")),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale price. Must be strictly positive and at most
/// [`MAX_UNIT_AMOUNT`].
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "precio".to_string(),
        });
    }
    check_unit_ceiling("precio", price)
}

/// Validates a unit cost. Zero is allowed, the ceiling is
/// [`MAX_UNIT_AMOUNT`].
pub fn validate_cost(cost: Money) -> ValidationResult<()> {
    if cost.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "costo".to_string(),
        });
    }
    check_unit_ceiling("costo", cost)
}

fn check_unit_ceiling(field: &str, amount: Money) -> ValidationResult<()> {
    if amount > MAX_UNIT_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_AMOUNT.pesos(),
        });
    }
    Ok(())
}

/// Validates an expense amount. Must be strictly positive.
pub fn validate_expense_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "monto".to_string(),
        });
    }
    check_unit_ceiling("monto", amount)
}

/// Validates a tax rate expressed as a fraction.
///
/// ## Rules
/// - Must be finite
/// - Must be between 0.0 and 1.0 (0% to 100%)
/// - Must be a whole number of basis points (`0.1925` is fine, `0.12345` is not)
pub fn validate_tax_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "IVA".to_string(),
            min: 0,
            max: 1,
        });
    }

    let bps = rate * 10_000.0;
    if (bps - bps.round()).abs() > 1e-6 {
        return Err(ValidationError::InvalidFormat {
            field: "IVA".to_string(),
            reason: "máximo dos decimales en el porcentaje".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
