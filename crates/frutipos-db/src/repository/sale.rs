//! # Sale Repository
//!
//! The append-only sales log and the checkout commit.
//!
//! ## Checkout Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(sale)                                                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    products = load(frutipos_products)                                   │
//! │    sales    = load(frutipos_sales)                                      │
//! │    for item in sale.items:                                              │
//! │        product.stock -= item.quantity   (skipped if product deleted)    │
//! │    sales.push(sale)                                                     │
//! │    save(frutipos_products), save(frutipos_sales)                        │
//! │  COMMIT  ← both collections change together, or neither does           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use frutipos_core::{CoreError, Product, Sale};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::store::{Collection, CollectionStore};

/// Repository for the sales log.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: CollectionStore,
}

impl SaleRepository {
    pub fn new(store: CollectionStore) -> Self {
        SaleRepository { store }
    }

    /// All sales in commit order.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        self.store.load(Collection::Sales, Vec::new).await
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }

    /// Appends `sale` and decrements stock for every line, atomically.
    ///
    /// Returns the catalog as it stands after the commit.
    ///
    /// ## Errors
    /// - `Rule(EmptyCart)` if the sale has no lines; nothing is written
    /// - Any storage error; nothing is written
    pub async fn commit(&self, sale: &Sale) -> DbResult<Vec<Product>> {
        if sale.items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        debug!(sale_id = %sale.id, lines = sale.items.len(), "Committing sale");

        let mut tx = self.store.begin().await?;
        let mut products: Vec<Product> = tx.load(Collection::Products, Product::demo_catalog).await?;
        let mut sales: Vec<Sale> = tx.load(Collection::Sales, Vec::new).await?;

        for item in &sale.items {
            match products.iter_mut().find(|p| p.id == item.product.id) {
                Some(product) => {
                    product.stock -= item.quantity;
                    if product.stock < 0 {
                        warn!(
                            product_id = %product.id,
                            stock = product.stock,
                            "Stock went negative after checkout"
                        );
                    }
                }
                None => debug!(
                    product_id = %item.product.id,
                    "Sold product no longer in catalog, skipping stock update"
                ),
            }
        }

        sales.push(sale.clone());
        tx.save(Collection::Products, &products).await?;
        tx.save(Collection::Sales, &sales).await?;
        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %sale.total_cents,
            "Sale committed"
        );
        Ok(products)
    }

    /// Appends a sale without touching stock. Used when importing history.
    pub async fn append(&self, sale: &Sale) -> DbResult<()> {
        let mut tx = self.store.begin().await?;
        let mut sales: Vec<Sale> = tx.load(Collection::Sales, Vec::new).await?;
        sales.push(sale.clone());
        tx.save(Collection::Sales, &sales).await?;
        tx.commit().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use chrono::Utc;
    use frutipos_core::{Cart, CoreError, Money, Product, Sale, TaxRate};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale_of(product: &Product, quantity: usize, id: &str) -> Sale {
        let mut cart = Cart::new();
        for _ in 0..quantity {
            cart.add_item(product).unwrap();
        }
        cart.prepare_checkout(TaxRate::from_bps(1900), id, Utc::now())
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_appends_and_decrements() {
        let db = db().await;
        let apple = db.products().find_by_barcode("1001").await.unwrap().unwrap();

        let sale = sale_of(&apple, 3, "s-1");
        let products = db.sales().commit(&sale).await.unwrap();

        let stored_apple = products.iter().find(|p| p.id == apple.id).unwrap();
        assert_eq!(stored_apple.stock, 47);

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].total_cents, Money::from_pesos(5355));

        let reloaded = db.products().get_by_id(&apple.id).await.unwrap().unwrap();
        assert_eq!(reloaded.stock, 47);
    }

    #[tokio::test]
    async fn test_commit_skips_deleted_products() {
        let db = db().await;
        let papaya = db.products().find_by_barcode("1003").await.unwrap().unwrap();
        let sale = sale_of(&papaya, 1, "s-1");

        db.products().delete(&papaya.id).await.unwrap();
        let products = db.sales().commit(&sale).await.unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(db.sales().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejects_empty_sale() {
        let db = db().await;
        let apple = db.products().find_by_barcode("1001").await.unwrap().unwrap();
        let empty = Sale {
            items: Vec::new(),
            ..sale_of(&apple, 1, "s-1")
        };

        let err = db.sales().commit(&empty).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::EmptyCart)));
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = db().await;
        let banana = db.products().find_by_barcode("1002").await.unwrap().unwrap();
        db.sales().commit(&sale_of(&banana, 2, "s-7")).await.unwrap();

        assert!(db.sales().get_by_id("s-7").await.unwrap().is_some());
        assert!(db.sales().get_by_id("s-8").await.unwrap().is_none());
    }
}
