//! # Domain Types
//!
//! Core domain types used throughout FrutiPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode        │   │  date           │   │  date           │       │
//! │  │  price / cost   │   │  items (snap)   │   │  amount         │       │
//! │  │  stock          │   │  total          │   │  type           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  StoreConfig    │   │  ProductDraft   │   │  ExpenseDraft   │       │
//! │  │  (singleton)    │   │  (raw input)    │   │  (raw input)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! Every type serializes to camelCase JSON. Money fields carry a `Cents`
//! suffix so the unit is explicit in storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cart::CartItem;
use crate::error::ValidationError;
use crate::money::{Money, TaxRate};
use crate::validation::{self, ValidationResult};

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque unique identifier.
    pub id: String,

    /// Code read by the scanner. Uniqueness is not enforced.
    pub barcode: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Free-form category (Frutas, Verduras, ...).
    #[serde(default)]
    pub category: String,

    /// Sale unit price.
    pub price_cents: Money,

    /// Unit cost, used for COGS.
    #[serde(default)]
    pub cost_cents: Money,

    /// Units on hand.
    #[serde(default)]
    pub stock: i64,
}

impl Product {
    /// Whether at least one unit can be sold.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether stock is below `threshold`.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }

    /// Case-insensitive name match or barcode substring match, the same
    /// rule the register search box applies.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term.to_lowercase()) || self.barcode.contains(term)
    }

    /// The catalog used when the store has never been saved.
    pub fn demo_catalog() -> Vec<Product> {
        let demo = |id: &str, barcode: &str, name: &str, price, cost, stock, category: &str| {
            Product {
                id: id.to_string(),
                barcode: barcode.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                price_cents: Money::from_pesos(price),
                cost_cents: Money::from_pesos(cost),
                stock,
            }
        };

        vec![
            demo("1", "1001", "Manzana Roja", 1500, 800, 50, "Frutas"),
            demo("2", "1002", "Banano Criollo", 500, 200, 120, "Frutas"),
            demo("3", "1003", "Papaya", 4500, 2500, 15, "Frutas"),
            demo("4", "1004", "Leche 1L", 3800, 3100, 20, "Lácteos"),
        ]
    }
}

/// Raw product form input, before coercion.
///
/// ## Coercion Rules
/// ```text
/// price / cost ── parse pesos ──► Money     (non-numeric → 0)
/// stock        ── parse integer ─► i64      (non-numeric → 0)
/// ```
/// After coercion, `name` and `barcode` must be non-empty, the price
/// positive, and neither price nor cost above [`crate::money::MAX_UNIT_AMOUNT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub barcode: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub cost: String,
    pub stock: String,
}

impl ProductDraft {
    /// Validates and coerces the draft into a product with the given id.
    pub fn into_product(self, id: impl Into<String>) -> ValidationResult<Product> {
        let name = self.name.trim().to_string();
        let barcode = self.barcode.trim().to_string();
        validation::validate_product_name(&name)?;
        validation::validate_barcode(&barcode)?;

        let price_cents = validation::coerce_money(&self.price);
        validation::validate_price(price_cents)?;

        let cost_cents = validation::coerce_money(&self.cost);
        validation::validate_cost(cost_cents)?;

        let category = match self.category.trim() {
            "" => crate::DEFAULT_CATEGORIES[0].to_string(),
            other => other.to_string(),
        };

        Ok(Product {
            id: id.into(),
            barcode,
            name,
            category,
            price_cents,
            cost_cents,
            stock: validation::coerce_quantity(&self.stock),
        })
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price_cents.to_decimal_string(),
            cost: product.cost_cents.to_decimal_string(),
            stock: product.stock.to_string(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Immutable once appended to the sales log.
///
/// ## Invariants
/// - `subtotal = Σ item.price × item.quantity`
/// - `tax = subtotal × tax rate at the time of sale`
/// - `total = subtotal + tax`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Product snapshots as they were in the cart.
    pub items: Vec<CartItem>,
    pub subtotal_cents: Money,
    pub tax_cents: Money,
    pub total_cents: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
}

impl Sale {
    /// Last six characters of the id, printed as the invoice number.
    pub fn short_id(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(5)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.id[start..]
    }

    /// Cost of goods sold for this sale, from the snapshotted costs.
    pub fn cogs(&self) -> Money {
        self.items.iter().map(CartItem::line_cost).sum()
    }

    /// Total units sold.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Kind of expense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    /// Merchandise purchase.
    Purchase,
    /// Utilities and services.
    Service,
    #[default]
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 3] = [ExpenseType::Purchase, ExpenseType::Service, ExpenseType::Other];

    /// Label shown to the operator.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Purchase => "Compra Mercancía",
            ExpenseType::Service => "Servicios",
            ExpenseType::Other => "Otros",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Purchase => "purchase",
            ExpenseType::Service => "service",
            ExpenseType::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "purchase" | "compra" => Ok(ExpenseType::Purchase),
            "service" | "servicio" | "servicios" => Ok(ExpenseType::Service),
            "other" | "otro" | "otros" => Ok(ExpenseType::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "tipo".to_string(),
                allowed: ExpenseType::ALL.iter().map(|t| t.to_string()).collect(),
            }),
        }
    }
}

/// A recorded expense. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount_cents: Money,
    #[serde(rename = "type", default)]
    pub kind: ExpenseType,
}

/// Raw expense form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub kind: ExpenseType,
}

impl ExpenseDraft {
    /// Validates the draft. Description must be present and the amount
    /// strictly positive.
    pub fn into_expense(self, id: impl Into<String>, date: DateTime<Utc>) -> ValidationResult<Expense> {
        let description = self.description.trim().to_string();
        validation::validate_expense_description(&description)?;

        let amount_cents = validation::coerce_money(&self.amount);
        validation::validate_expense_amount(amount_cents)?;

        Ok(Expense {
            id: id.into(),
            date,
            description,
            amount_cents,
            kind: self.kind,
        })
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Store identity and the flat tax rate. Exactly one instance exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Decimal fraction (0.19 = 19%). Calculations use whole basis points,
    /// so [`StoreConfig::validate`] rejects anything finer than 0.0001.
    pub tax_rate: f64,
    /// Tax identification number.
    pub nit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl StoreConfig {
    /// Tax rate in basis points, used by every calculation.
    pub fn effective_tax_rate(&self) -> TaxRate {
        TaxRate::from_fraction(self.tax_rate)
    }

    /// Validates the record before it replaces the stored one.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_store_name(&self.name)?;
        validation::validate_tax_rate(self.tax_rate)
    }
}

impl Default for StoreConfig {
    /// The configuration used before the operator saves one. Fruit is
    /// usually VAT exempt, so the default rate is zero.
    fn default() -> Self {
        StoreConfig {
            name: "La Frutería del Barrio".to_string(),
            address: "Calle 123 # 45-67, Bogotá, Colombia".to_string(),
            phone: "300 123 4567".to_string(),
            tax_rate: 0.0,
            nit: "900.123.456-7".to_string(),
            logo_url: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> ProductDraft {
        ProductDraft {
            barcode: "2001".to_string(),
            name: "Mango Tommy".to_string(),
            category: "Frutas".to_string(),
            price: "2500".to_string(),
            cost: "1200".to_string(),
            stock: "30".to_string(),
        }
    }

    #[test]
    fn test_draft_into_product() {
        let product = draft().into_product("p-1").unwrap();
        assert_eq!(product.id, "p-1");
        assert_eq!(product.price_cents, Money::from_pesos(2500));
        assert_eq!(product.cost_cents, Money::from_pesos(1200));
        assert_eq!(product.stock, 30);
    }

    #[test]
    fn test_draft_coerces_non_numeric_to_zero() {
        let product = ProductDraft {
            cost: "n/a".to_string(),
            stock: "".to_string(),
            ..draft()
        }
        .into_product("p-1")
        .unwrap();

        assert!(product.cost_cents.is_zero());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_draft_rejects_missing_fields() {
        let missing_name = ProductDraft {
            name: "  ".to_string(),
            ..draft()
        };
        assert!(missing_name.into_product("x").is_err());

        let missing_barcode = ProductDraft {
            barcode: String::new(),
            ..draft()
        };
        assert!(missing_barcode.into_product("x").is_err());

        // Non-numeric price coerces to zero, which is not positive
        let bad_price = ProductDraft {
            price: "gratis".to_string(),
            ..draft()
        };
        assert_eq!(
            bad_price.into_product("x"),
            Err(ValidationError::MustBePositive {
                field: "precio".to_string()
            })
        );
    }

    #[test]
    fn test_draft_rejects_huge_prices() {
        let saturating = ProductDraft {
            price: "1e17".to_string(),
            stock: "5".to_string(),
            ..draft()
        };
        assert!(saturating.into_product("x").is_err());

        let too_expensive = ProductDraft {
            price: "20000000000".to_string(),
            ..draft()
        };
        assert!(matches!(
            too_expensive.into_product("x"),
            Err(ValidationError::OutOfRange { .. })
        ));

        let costly = ProductDraft {
            cost: "1e12".to_string(),
            ..draft()
        };
        assert!(costly.into_product("x").is_err());
    }

    #[test]
    fn test_draft_defaults_category() {
        let product = ProductDraft {
            category: String::new(),
            ..draft()
        }
        .into_product("x")
        .unwrap();
        assert_eq!(product.category, "Frutas");
    }

    #[test]
    fn test_product_matches_name_or_barcode() {
        let catalog = Product::demo_catalog();
        let apple = &catalog[0];
        assert!(apple.matches("manzana"));
        assert!(apple.matches("100"));
        assert!(apple.matches(""));
        assert!(!apple.matches("pera"));
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(&Product::demo_catalog()[0]).unwrap();
        assert_eq!(json["priceCents"], 150_000);
        assert_eq!(json["costCents"], 80_000);
        assert_eq!(json["barcode"], "1001");
    }

    #[test]
    fn test_sale_short_id() {
        let sale = Sale {
            id: "1718000000123".to_string(),
            date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            items: Vec::new(),
            subtotal_cents: Money::zero(),
            tax_cents: Money::zero(),
            total_cents: Money::zero(),
            client_email: None,
        };
        assert_eq!(sale.short_id(), "000123");

        let short = Sale {
            id: "42".to_string(),
            ..sale
        };
        assert_eq!(short.short_id(), "42");
    }

    #[test]
    fn test_expense_type_parsing() {
        assert_eq!("purchase".parse::<ExpenseType>().unwrap(), ExpenseType::Purchase);
        assert_eq!("Servicios".parse::<ExpenseType>().unwrap(), ExpenseType::Service);
        assert!("rent".parse::<ExpenseType>().is_err());
        assert_eq!(ExpenseType::default(), ExpenseType::Other);
    }

    #[test]
    fn test_expense_draft_validation() {
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expense = ExpenseDraft {
            description: "Pago de luz".to_string(),
            amount: "85000".to_string(),
            kind: ExpenseType::Service,
        }
        .into_expense("e-1", date)
        .unwrap();
        assert_eq!(expense.amount_cents, Money::from_pesos(85_000));

        let zero = ExpenseDraft {
            description: "Nada".to_string(),
            amount: "0".to_string(),
            kind: ExpenseType::Other,
        };
        assert!(zero.into_expense("e-2", date).is_err());
    }

    #[test]
    fn test_expense_type_serializes_as_type_field() {
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expense = Expense {
            id: "e-1".to_string(),
            date,
            description: "Bolsas".to_string(),
            amount_cents: Money::from_pesos(12_000),
            kind: ExpenseType::Purchase,
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["type"], "purchase");
        assert_eq!(json["amountCents"], 1_200_000);
    }

    #[test]
    fn test_store_config_default_and_rate() {
        let config = StoreConfig::default();
        assert!(config.effective_tax_rate().is_zero());
        assert!(config.validate().is_ok());

        let taxed = StoreConfig {
            tax_rate: 0.19,
            ..config
        };
        assert_eq!(taxed.effective_tax_rate().bps(), 1900);
    }

    #[test]
    fn test_store_config_rejects_bad_rate() {
        let config = StoreConfig {
            tax_rate: 1.5,
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());

        let too_fine = StoreConfig {
            tax_rate: 0.12345,
            ..StoreConfig::default()
        };
        assert!(too_fine.validate().is_err());
    }
}
