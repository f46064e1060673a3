//! # frutipos-core: Pure Business Logic for FrutiPOS
//!
//! All the store's business rules live here as pure functions with zero I/O:
//! catalog validation, the order cart, tax, profit/loss aggregation, receipt
//! composition and the CSV sales export.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FrutiPOS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (frutipos binary)                   │   │
//! │  │    product ──► register ──► sale ──► expense ──► report         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ frutipos-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ finance │ │ receipt │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        frutipos-db (collection store)   frutipos-advisor       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Expense, StoreConfig)
//! - [`money`] - Money and TaxRate with integer arithmetic
//! - [`cart`] - The in-progress order and its totals
//! - [`finance`] - Revenue, COGS, profit and rankings over the history
//! - [`receipt`] - Receipt and client notification composition
//! - [`export`] - CSV export of the sales log
//! - [`validation`] - Input coercion and business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use frutipos_core::money::{Money, TaxRate};
//!
//! let subtotal = Money::from_pesos(4500);
//! let tax = subtotal.calculate_tax(TaxRate::from_fraction(0.19));
//!
//! assert_eq!(tax, Money::from_pesos(855));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod export;
pub mod finance;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, OrderState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use finance::{FinancialSummary, MonthlyRevenue, ProductRanking};
pub use money::{Money, TaxRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products with stock below this level are reported as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of products shown in the best sellers ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Categories offered when creating a product. The set is open: any other
/// string is accepted.
pub const DEFAULT_CATEGORIES: &[&str] = &["Frutas", "Verduras", "Lácteos", "Abarrotes"];
