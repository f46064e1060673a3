//! # Store Configuration State
//!
//! The store identity and tax rate, loaded once at startup and passed to
//! the handlers that print receipts or compute totals.
//!
//! ## Update Flow
//! ```text
//! config set --tax-rate 0.19
//!        │
//!        ▼
//! StoreConfigState::update(db, |c| c.tax_rate = 0.19)
//!        │
//!        ├── 1. copy the cached config and apply the change
//!        ├── 2. validate + save to the store  ──► error: cache untouched
//!        └── 3. replace the cache
//! ```
//!
//! `update` is the only way to change the configuration, so the cache and
//! the store never disagree.

use std::sync::{Mutex, MutexGuard};

use frutipos_core::{StoreConfig, TaxRate};
use frutipos_db::Database;
use tracing::debug;

use crate::error::AppResult;

#[derive(Debug, Default)]
pub struct StoreConfigState {
    config: Mutex<StoreConfig>,
}

impl StoreConfigState {
    pub fn new(config: StoreConfig) -> Self {
        StoreConfigState {
            config: Mutex::new(config),
        }
    }

    /// Loads the stored configuration, or the default when none was saved.
    pub async fn load(db: &Database) -> AppResult<Self> {
        Ok(Self::new(db.config().get().await?))
    }

    fn lock(&self) -> MutexGuard<'_, StoreConfig> {
        self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of the current configuration.
    pub fn get(&self) -> StoreConfig {
        self.lock().clone()
    }

    /// Tax rate used for carts and checkout.
    pub fn tax_rate(&self) -> TaxRate {
        self.lock().effective_tax_rate()
    }

    /// Applies `change`, persists the result and only then updates the
    /// cached copy. Returns the saved configuration.
    pub async fn update<F>(&self, db: &Database, change: F) -> AppResult<StoreConfig>
    where
        F: FnOnce(&mut StoreConfig),
    {
        let mut next = self.get();
        change(&mut next);

        db.config().save(&next).await?;
        *self.lock() = next.clone();

        debug!(store = %next.name, "Store configuration cache refreshed");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frutipos_db::DbConfig;

    #[tokio::test]
    async fn test_update_writes_through() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = StoreConfigState::load(&db).await.unwrap();
        assert!(state.tax_rate().is_zero());

        state.update(&db, |c| c.tax_rate = 0.19).await.unwrap();

        assert_eq!(state.tax_rate().bps(), 1900);
        assert_eq!(db.config().get().await.unwrap().tax_rate, 0.19);
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_cache() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = StoreConfigState::load(&db).await.unwrap();

        let result = state.update(&db, |c| c.name = "   ".to_string()).await;

        assert!(result.is_err());
        assert_eq!(state.get(), StoreConfig::default());
        assert_eq!(db.config().get().await.unwrap(), StoreConfig::default());
    }
}
