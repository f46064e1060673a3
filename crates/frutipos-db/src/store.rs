//! # Collection Store
//!
//! Key-value persistence of the four collections. Each collection is one
//! JSON document under a fixed key; a write replaces the whole document.
//!
//! ## Read Fallback
//! ```text
//! load(collection, default)
//!      │
//!      ├── no row ───────────────► default()
//!      ├── row, JSON decodes ────► stored value
//!      └── row, JSON is corrupt ─► warn! + default()
//! ```
//!
//! ## Multi-Collection Writes
//! [`CollectionStore::begin`] opens a SQLite transaction. Every load and
//! save made through the returned [`StoreTransaction`] either lands
//! together on [`StoreTransaction::commit`] or not at all.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

// =============================================================================
// Collection Keys
// =============================================================================

/// The persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Sales,
    Expenses,
    Config,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Products,
        Collection::Sales,
        Collection::Expenses,
        Collection::Config,
    ];

    /// Storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Products => "frutipos_products",
            Collection::Sales => "frutipos_sales",
            Collection::Expenses => "frutipos_expenses",
            Collection::Config => "frutipos_config",
        }
    }
}

// =============================================================================
// Raw Row Access
// =============================================================================

async fn read_raw(conn: &mut SqliteConnection, collection: Collection) -> DbResult<Option<String>> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM collections WHERE name = ?1")
        .bind(collection.key())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(value)
}

async fn write_raw(conn: &mut SqliteConnection, collection: Collection, json: String) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO collections (name, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(name) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection.key())
    .bind(json)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    debug!(collection = collection.key(), "Collection written");
    Ok(())
}

fn decode<T: DeserializeOwned>(
    collection: Collection,
    raw: Option<String>,
    default: impl FnOnce() -> T,
) -> T {
    let Some(raw) = raw else {
        debug!(collection = collection.key(), "Collection absent, using default");
        return default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                collection = collection.key(),
                error = %e,
                "Stored collection is unreadable, using default"
            );
            default()
        }
    }
}

// =============================================================================
// Collection Store
// =============================================================================

/// Load/save access to the collections.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    pool: SqlitePool,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        CollectionStore { pool }
    }

    /// Loads `collection`, falling back to `default` when it was never
    /// saved or cannot be decoded.
    pub async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
        default: impl FnOnce() -> T,
    ) -> DbResult<T> {
        let mut conn = self.pool.acquire().await?;
        let raw = read_raw(&mut conn, collection).await?;
        Ok(decode(collection, raw, default))
    }

    /// Replaces `collection` with `value`.
    pub async fn save<T: Serialize + ?Sized>(&self, collection: Collection, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        let mut conn = self.pool.acquire().await?;
        write_raw(&mut conn, collection, json).await
    }

    /// Whether `collection` has ever been saved.
    pub async fn contains(&self, collection: Collection) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(read_raw(&mut conn, collection).await?.is_some())
    }

    /// Opens a transaction spanning several collections.
    pub async fn begin(&self) -> DbResult<StoreTransaction> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(StoreTransaction { tx })
    }
}

/// A set of collection reads and writes applied atomically.
///
/// Dropping it without calling [`StoreTransaction::commit`] rolls back.
pub struct StoreTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl StoreTransaction {
    /// Same fallback rules as [`CollectionStore::load`].
    pub async fn load<T: DeserializeOwned>(
        &mut self,
        collection: Collection,
        default: impl FnOnce() -> T,
    ) -> DbResult<T> {
        let raw = read_raw(&mut self.tx, collection).await?;
        Ok(decode(collection, raw, default))
    }

    pub async fn save<T: Serialize + ?Sized>(&mut self, collection: Collection, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        write_raw(&mut self.tx, collection, json).await
    }

    /// Makes every save visible at once.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn store() -> (Database, CollectionStore) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.store();
        (db, store)
    }

    #[tokio::test]
    async fn test_absent_collection_uses_default() {
        let (_db, store) = store().await;
        let values: Vec<i64> = store.load(Collection::Sales, || vec![7]).await.unwrap();
        assert_eq!(values, vec![7]);
        assert!(!store.contains(Collection::Sales).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_db, store) = store().await;
        store.save(Collection::Expenses, &vec![1, 2, 3]).await.unwrap();
        store.save(Collection::Expenses, &vec![4]).await.unwrap();

        let values: Vec<i64> = store.load(Collection::Expenses, Vec::new).await.unwrap();
        assert_eq!(values, vec![4]);
        assert!(store.contains(Collection::Expenses).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_collection_uses_default() {
        let (db, store) = store().await;
        sqlx::query("INSERT INTO collections (name, value, updated_at) VALUES (?1, ?2, ?3)")
            .bind(Collection::Products.key())
            .bind("{not json")
            .bind("2026-01-01T00:00:00Z")
            .execute(db.pool())
            .await
            .unwrap();

        let values: Vec<i64> = store.load(Collection::Products, || vec![0]).await.unwrap();
        assert_eq!(values, vec![0]);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let (_db, store) = store().await;
        {
            let mut tx = store.begin().await.unwrap();
            tx.save(Collection::Sales, &vec![1]).await.unwrap();
            tx.save(Collection::Products, &vec![2]).await.unwrap();
        }

        assert!(!store.contains(Collection::Sales).await.unwrap());
        assert!(!store.contains(Collection::Products).await.unwrap());
    }

    #[tokio::test]
    async fn test_committed_transaction_persists_all() {
        let (_db, store) = store().await;
        let mut tx = store.begin().await.unwrap();
        let existing: Vec<i64> = tx.load(Collection::Sales, Vec::new).await.unwrap();
        assert!(existing.is_empty());
        tx.save(Collection::Sales, &vec![1]).await.unwrap();
        tx.save(Collection::Products, &vec![2]).await.unwrap();
        tx.commit().await.unwrap();

        let sales: Vec<i64> = store.load(Collection::Sales, Vec::new).await.unwrap();
        let products: Vec<i64> = store.load(Collection::Products, Vec::new).await.unwrap();
        assert_eq!(sales, vec![1]);
        assert_eq!(products, vec![2]);
    }

    #[test]
    fn test_collection_keys() {
        let keys: Vec<_> = Collection::ALL.iter().map(Collection::key).collect();
        assert_eq!(
            keys,
            vec!["frutipos_products", "frutipos_sales", "frutipos_expenses", "frutipos_config"]
        );
    }
}
