//! # Order Cart
//!
//! The in-progress order at the register.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order State Machine                              │
//! │                                                                         │
//! │              add_item                       prepare_checkout            │
//! │   ┌───────┐ ─────────► ┌──────────┐ ──────────────────────────┐        │
//! │   │ Empty │            │ Building │  ◄── add / adjust / remove │        │
//! │   └───────┘ ◄───────── └──────────┘                            ▼        │
//! │       ▲       clear /                          sale persisted by store  │
//! │       │    last line removed                          │                 │
//! │       │                                               ▼                 │
//! │       │    clear / add_item                  ┌───────────────┐          │
//! │       └───────────────────────────────────── │   Committed   │          │
//! │                                              └───────────────┘          │
//! │                                              complete_checkout          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Semantics
//! Each line keeps a copy of the product taken when it was first added.
//! Price, cost and the stock ceiling used by [`Cart::adjust_quantity`] come
//! from that snapshot. Later catalog edits do not reach the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::types::{Product, Sale};
use crate::validation::validate_email;

// =============================================================================
// Cart Item
// =============================================================================

/// A cart line: a product snapshot plus a quantity.
///
/// Serialized flat, so a persisted line carries every product field next to
/// `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// Starts a line with one unit of `product`.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product: product.clone(),
            quantity: 1,
        }
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price_cents.multiply_quantity(self.quantity)
    }

    /// Unit cost × quantity.
    pub fn line_cost(&self) -> Money {
        self.product.cost_cents.multiply_quantity(self.quantity)
    }

    fn checked_line_total(&self) -> Option<Money> {
        self.product.price_cents.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order State
// =============================================================================

/// Where the order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// No lines.
    Empty,
    /// At least one line, not yet checked out.
    Building,
    /// The last order was persisted; the cart is empty and the receipt is
    /// still on screen.
    Committed,
}

// =============================================================================
// Cart
// =============================================================================

/// The order being rung up.
///
/// ## Invariants
/// - Lines are unique by product id
/// - Every quantity is in `1..=snapshot stock`
/// - Subtotal, cost and a 100% tax on the subtotal fit in [`Money`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    client_email: Option<String>,
    consent: bool,
    last_sale_id: Option<String>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OrderState {
        if !self.items.is_empty() {
            OrderState::Building
        } else if self.last_sale_id.is_some() {
            OrderState::Committed
        } else {
            OrderState::Empty
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id of the sale committed from this cart, while in `Committed`.
    pub fn last_sale_id(&self) -> Option<&str> {
        self.last_sale_id.as_deref()
    }

    pub fn client_email(&self) -> Option<&str> {
        self.client_email.as_deref()
    }

    pub fn has_consent(&self) -> bool {
        self.consent
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Not in cart: a new line with quantity 1 is appended
    /// - Already in cart: the line's quantity goes up by 1
    ///
    /// `product` must be the catalog's current version; its stock is the
    /// limit checked here. The line's snapshot is not refreshed.
    ///
    /// ## Errors
    /// - [`CoreError::OutOfStock`] when the product has no stock
    /// - [`CoreError::InsufficientStock`] when one more unit exceeds stock
    /// - [`CoreError::AmountTooLarge`] when the order total would overflow
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if !product.is_in_stock() {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        match self.items.iter().position(|i| i.product.id == product.id) {
            Some(index) => {
                let requested = self.items[index].quantity.saturating_add(1);
                if requested > product.stock {
                    return Err(CoreError::InsufficientStock {
                        name: product.name.clone(),
                        available: product.stock,
                        requested,
                    });
                }
                self.check_amounts(index, requested)?;
                self.items[index].quantity = requested;
            }
            None => {
                self.items.push(CartItem::from_product(product));
                let last = self.items.len() - 1;
                if let Err(e) = self.check_amounts(last, 1) {
                    self.items.pop();
                    return Err(e);
                }
            }
        }

        self.last_sale_id = None;
        Ok(())
    }

    /// Changes a line's quantity by `delta` and returns the new quantity.
    ///
    /// The result must stay within `1..=snapshot stock`; otherwise the cart
    /// is left untouched. Removing a line goes through [`Cart::remove_item`].
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> CoreResult<i64> {
        let index = self
            .items
            .iter()
            .position(|i| i.product.id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;

        let item = &self.items[index];
        let requested = item.quantity.saturating_add(delta);
        if requested <= 0 || requested > item.product.stock {
            return Err(CoreError::QuantityOutOfRange {
                name: item.product.name.clone(),
                requested,
                max: item.product.stock,
            });
        }

        self.check_amounts(index, requested)?;
        self.items[index].quantity = requested;
        Ok(requested)
    }

    /// Fails with [`CoreError::AmountTooLarge`] if line `index` holding
    /// `quantity` units would push the order outside the money range.
    fn check_amounts(&self, index: usize, quantity: i64) -> CoreResult<()> {
        let mut subtotal = Some(Money::zero());
        let mut cost = Some(Money::zero());

        for (i, item) in self.items.iter().enumerate() {
            let qty = if i == index { quantity } else { item.quantity };
            subtotal = subtotal.and_then(|s| {
                item.product
                    .price_cents
                    .checked_multiply_quantity(qty)
                    .and_then(|line| s.checked_add(line))
            });
            cost = cost.and_then(|c| {
                item.product
                    .cost_cents
                    .checked_multiply_quantity(qty)
                    .and_then(|line| c.checked_add(line))
            });
        }

        // Tax never exceeds the subtotal, so doubling it bounds the total
        match (subtotal, cost) {
            (Some(s), Some(_)) if s.checked_add(s).is_some() => Ok(()),
            _ => Err(CoreError::AmountTooLarge),
        }
    }

    /// Removes a line. Removing a product that is not in the cart is a no-op.
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.product.id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Sets or clears the client email. Blank input clears it.
    pub fn set_client_email(&mut self, email: Option<&str>) {
        self.client_email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if self.client_email.is_none() {
            self.consent = false;
        }
    }

    /// Records whether the client authorized processing of their data.
    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    /// Empties the cart and forgets the client contact.
    pub fn clear(&mut self) {
        self.items.clear();
        self.client_email = None;
        self.consent = false;
        self.last_sale_id = None;
    }

    /// Totals at `tax_rate`.
    pub fn totals(&self, tax_rate: TaxRate) -> CoreResult<CartTotals> {
        CartTotals::compute(&self.items, tax_rate)
    }

    /// Builds the sale this cart would commit. The cart is not modified.
    ///
    /// ## Checks (in order)
    /// 1. At least one line
    /// 2. A client email, if present, is well formed
    /// 3. A client email, if present, comes with consent
    pub fn prepare_checkout(
        &self,
        tax_rate: TaxRate,
        sale_id: impl Into<String>,
        date: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        if let Some(email) = &self.client_email {
            validate_email(email)?;
            if !self.consent {
                return Err(CoreError::ConsentRequired);
            }
        }

        let totals = self.totals(tax_rate)?;
        Ok(Sale {
            id: sale_id.into(),
            date,
            items: self.items.clone(),
            subtotal_cents: totals.subtotal,
            tax_cents: totals.tax,
            total_cents: totals.total,
            client_email: self.client_email.clone(),
        })
    }

    /// Marks `sale_id` as committed and empties the cart. Call only after
    /// the sale has been persisted.
    pub fn complete_checkout(&mut self, sale_id: impl Into<String>) {
        self.clear();
        self.last_sale_id = Some(sale_id.into());
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Totals for a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// `subtotal = Σ price × qty`, `tax = subtotal × rate`, `total = subtotal + tax`.
    ///
    /// Fails with [`CoreError::AmountTooLarge`] instead of overflowing.
    pub fn compute(items: &[CartItem], tax_rate: TaxRate) -> CoreResult<Self> {
        let mut subtotal = Money::zero();
        let mut total_quantity: i64 = 0;
        for item in items {
            subtotal = item
                .checked_line_total()
                .and_then(|line| subtotal.checked_add(line))
                .ok_or(CoreError::AmountTooLarge)?;
            total_quantity = total_quantity.saturating_add(item.quantity);
        }

        let tax = subtotal.calculate_tax(tax_rate);
        let total = subtotal
            .checked_add(tax)
            .ok_or(CoreError::AmountTooLarge)?;

        Ok(CartTotals {
            line_count: items.len(),
            total_quantity,
            subtotal,
            tax,
            total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(id: &str, price: i64, cost: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: format!("BC-{}", id),
            name: format!("Product {}", id),
            category: "Frutas".to_string(),
            price_cents: Money::from_pesos(price),
            cost_cents: Money::from_pesos(cost),
            stock,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_add_three_units_with_iva() {
        let mut cart = Cart::new();
        let apple = product("A", 1500, 800, 50);

        for _ in 0..3 {
            cart.add_item(&apple).unwrap();
        }

        assert_eq!(cart.items().len(), 1);
        let totals = cart.totals(TaxRate::from_fraction(0.19)).unwrap();
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_pesos(4500));
        assert_eq!(totals.tax, Money::from_pesos(855));
        assert_eq!(totals.total, Money::from_pesos(5355));
    }

    #[test]
    fn test_add_out_of_stock_product() {
        let mut cart = Cart::new();
        let err = cart.add_item(&product("A", 1000, 500, 0)).unwrap_err();
        assert_eq!(
            err,
            CoreError::OutOfStock {
                name: "Product A".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_beyond_current_stock() {
        let mut cart = Cart::new();
        let papaya = product("P", 4500, 2500, 2);
        cart.add_item(&papaya).unwrap();
        cart.add_item(&papaya).unwrap();

        let err = cart.add_item(&papaya).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_checks_current_stock_not_snapshot() {
        let mut cart = Cart::new();
        let mut papaya = product("P", 4500, 2500, 5);
        cart.add_item(&papaya).unwrap();

        // Stock dropped in the catalog since the line was created
        papaya.stock = 1;
        assert!(cart.add_item(&papaya).is_err());
        assert_eq!(cart.items()[0].product.stock, 5);
    }

    #[test]
    fn test_adjust_quantity_bounds() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1000, 500, 3)).unwrap();

        assert_eq!(cart.adjust_quantity("A", 2).unwrap(), 3);
        assert!(matches!(
            cart.adjust_quantity("A", 1),
            Err(CoreError::QuantityOutOfRange { requested: 4, max: 3, .. })
        ));
        assert!(cart.adjust_quantity("A", -3).is_err());
        assert_eq!(cart.items()[0].quantity, 3);

        assert_eq!(cart.adjust_quantity("A", -2).unwrap(), 1);
        assert_eq!(
            cart.adjust_quantity("missing", 1),
            Err(CoreError::NotInCart("missing".to_string()))
        );
    }

    #[test]
    fn test_order_total_overflow_is_an_error() {
        let mut cart = Cart::new();
        let mut gold = product("G", 0, 0, 5);
        gold.price_cents = Money::from_cents(i64::MAX / 4);

        cart.add_item(&gold).unwrap();
        cart.add_item(&gold).unwrap();
        assert_eq!(cart.add_item(&gold), Err(CoreError::AmountTooLarge));
        assert_eq!(cart.adjust_quantity("G", 1), Err(CoreError::AmountTooLarge));
        assert_eq!(cart.items()[0].quantity, 2);

        let totals = cart.totals(TaxRate::zero()).unwrap();
        assert_eq!(totals.subtotal, Money::from_cents(i64::MAX / 4 * 2));
    }

    #[test]
    fn test_rejected_new_line_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let mut gold = product("G", 0, 0, 5);
        gold.price_cents = Money::from_cents(i64::MAX / 2);
        cart.add_item(&gold).unwrap();

        let mut silver = product("S", 0, 0, 5);
        silver.price_cents = Money::from_cents(i64::MAX / 2);
        assert_eq!(cart.add_item(&silver), Err(CoreError::AmountTooLarge));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_totals_of_overflowing_lines() {
        let line = CartItem {
            product: Product {
                price_cents: Money::from_cents(i64::MAX),
                ..product("X", 0, 0, 10)
            },
            quantity: 2,
        };
        assert_eq!(
            CartTotals::compute(&[line], TaxRate::zero()),
            Err(CoreError::AmountTooLarge)
        );
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1000, 500, 3)).unwrap();
        cart.add_item(&product("B", 2000, 500, 3)).unwrap();

        assert!(cart.remove_item("A").is_some());
        assert!(cart.remove_item("A").is_none());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id(), "B");
    }

    #[test]
    fn test_state_transitions() {
        let mut cart = Cart::new();
        assert_eq!(cart.state(), OrderState::Empty);

        cart.add_item(&product("A", 1000, 500, 3)).unwrap();
        assert_eq!(cart.state(), OrderState::Building);

        let sale = cart.prepare_checkout(TaxRate::zero(), "sale-1", now()).unwrap();
        assert_eq!(cart.state(), OrderState::Building);

        cart.complete_checkout(sale.id);
        assert_eq!(cart.state(), OrderState::Committed);
        assert!(cart.is_empty());
        assert_eq!(cart.last_sale_id(), Some("sale-1"));

        cart.clear();
        assert_eq!(cart.state(), OrderState::Empty);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let cart = Cart::new();
        assert_eq!(
            cart.prepare_checkout(TaxRate::zero(), "x", now()),
            Err(CoreError::EmptyCart)
        );
    }

    #[test]
    fn test_checkout_requires_consent_with_email() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1000, 500, 3)).unwrap();
        cart.set_client_email(Some("cliente@correo.co"));

        assert_eq!(
            cart.prepare_checkout(TaxRate::zero(), "x", now()),
            Err(CoreError::ConsentRequired)
        );

        cart.set_consent(true);
        let sale = cart.prepare_checkout(TaxRate::zero(), "x", now()).unwrap();
        assert_eq!(sale.client_email.as_deref(), Some("cliente@correo.co"));
    }

    #[test]
    fn test_checkout_rejects_malformed_email() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1000, 500, 3)).unwrap();
        cart.set_client_email(Some("cliente"));
        cart.set_consent(true);

        assert!(matches!(
            cart.prepare_checkout(TaxRate::zero(), "x", now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_email_clears_contact() {
        let mut cart = Cart::new();
        cart.set_client_email(Some("a@b.co"));
        cart.set_consent(true);
        cart.set_client_email(Some("   "));
        assert_eq!(cart.client_email(), None);
        assert!(!cart.has_consent());
    }

    #[test]
    fn test_sale_snapshot_and_totals() {
        let mut cart = Cart::new();
        let apple = product("A", 1500, 800, 50);
        let banana = product("B", 500, 200, 120);
        cart.add_item(&apple).unwrap();
        cart.add_item(&apple).unwrap();
        cart.add_item(&banana).unwrap();

        let sale = cart
            .prepare_checkout(TaxRate::from_bps(1900), "sale-9", now())
            .unwrap();

        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.subtotal_cents, Money::from_pesos(3500));
        assert_eq!(sale.tax_cents, Money::from_pesos(665));
        assert_eq!(sale.total_cents, Money::from_pesos(4165));
        assert_eq!(sale.cogs(), Money::from_pesos(1800));
    }

    #[test]
    fn test_cart_item_serializes_flat() {
        let item = CartItem {
            product: product("A", 1500, 800, 50),
            quantity: 3,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "A");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["priceCents"], 150_000);

        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
