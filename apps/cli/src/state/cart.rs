//! # Cart State
//!
//! Holds the single open order for the register session.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────┐  scan/add   ┌──────────┐  checkout   ┌───────────┐
//! │  Empty   │────────────►│ Building │────────────►│ Committed │
//! └──────────┘             └──────────┘             └───────────┘
//!      ▲                        │  clear                  │ scan/add
//!      └────────────────────────┘                         ▼
//!                                                    (Building)
//! ```
//!
//! The cart lives only in memory. Quitting the session discards it.

use std::sync::{Mutex, MutexGuard};

use frutipos_core::Cart;

/// Access to the open cart.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Mutex<Cart>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // Cart methods validate before mutating, so a poisoned cart is consistent
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals(rate))?;
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frutipos_core::{OrderState, Product};

    #[test]
    fn test_cart_state_roundtrip() {
        let state = CartState::new();
        let catalog = Product::demo_catalog();

        state.with_cart_mut(|c| c.add_item(&catalog[0])).unwrap();
        state.with_cart_mut(|c| c.add_item(&catalog[0])).unwrap();

        assert_eq!(state.with_cart(|c| c.items()[0].quantity), 2);
        assert_eq!(state.with_cart(Cart::state), OrderState::Building);

        state.with_cart_mut(Cart::clear);
        assert!(state.with_cart(Cart::is_empty));
    }
}
