//! # Store Configuration Repository
//!
//! The single store configuration record.

use frutipos_core::StoreConfig;
use tracing::info;

use crate::error::DbResult;
use crate::store::{Collection, CollectionStore};

#[derive(Debug, Clone)]
pub struct ConfigRepository {
    store: CollectionStore,
}

impl ConfigRepository {
    pub fn new(store: CollectionStore) -> Self {
        ConfigRepository { store }
    }

    /// The stored configuration, or the built-in default.
    pub async fn get(&self) -> DbResult<StoreConfig> {
        self.store.load(Collection::Config, StoreConfig::default).await
    }

    /// Validates and replaces the configuration.
    pub async fn save(&self, config: &StoreConfig) -> DbResult<()> {
        config.validate()?;
        self.store.save(Collection::Config, config).await?;

        info!(
            name = %config.name,
            tax_bps = config.effective_tax_rate().bps(),
            "Store configuration saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use frutipos_core::StoreConfig;

    #[tokio::test]
    async fn test_default_then_save() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.config();

        let config = repo.get().await.unwrap();
        assert_eq!(config, StoreConfig::default());

        let updated = StoreConfig {
            tax_rate: 0.19,
            name: "Frutas Doña Rosa".to_string(),
            ..config
        };
        repo.save(&updated).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bad = StoreConfig {
            tax_rate: 2.0,
            ..StoreConfig::default()
        };
        assert!(db.config().save(&bad).await.is_err());
        assert_eq!(db.config().get().await.unwrap(), StoreConfig::default());
    }
}
