//! # Product Repository
//!
//! The product catalog. A store that has never saved its catalog starts
//! with the demo catalog.
//!
//! ## Scan Lookup
//! ```text
//! Scanner reads "1003"
//!      │
//!      ▼
//! find_by_barcode ── first product whose barcode == "1003" ──► Papaya
//!      │
//!      └── none ──► Ok(None), the register reports "not found"
//! ```

use frutipos_core::types::new_id;
use frutipos_core::validation::validate_search_query;
use frutipos_core::{Product, ProductDraft};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::store::{Collection, CollectionStore};

/// Repository for catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: CollectionStore,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: CollectionStore) -> Self {
        ProductRepository { store }
    }

    /// The whole catalog in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        self.store
            .load(Collection::Products, Product::demo_catalog)
            .await
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    /// Resolves a scanned code. Barcodes are not unique; the first match in
    /// catalog order wins.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let barcode = barcode.trim();
        debug!(barcode = %barcode, "Looking up barcode");
        Ok(self.list().await?.into_iter().find(|p| p.barcode == barcode))
    }

    /// Case-insensitive name match or barcode substring match. An empty
    /// query returns the whole catalog.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        let products: Vec<Product> = self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.matches(&query))
            .collect();

        debug!(query = %query, count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Products with stock strictly below `threshold`.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect())
    }

    /// Validates `draft` and appends it under a fresh id.
    pub async fn insert(&self, draft: ProductDraft) -> DbResult<Product> {
        let product = draft.into_product(new_id())?;

        let mut tx = self.store.begin().await?;
        let mut products: Vec<Product> = tx.load(Collection::Products, Product::demo_catalog).await?;
        products.push(product.clone());
        tx.save(Collection::Products, &products).await?;
        tx.commit().await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replaces every field of product `id` with the validated draft.
    pub async fn update(&self, id: &str, draft: ProductDraft) -> DbResult<Product> {
        let product = draft.into_product(id)?;

        let mut tx = self.store.begin().await?;
        let mut products: Vec<Product> = tx.load(Collection::Products, Product::demo_catalog).await?;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("el producto", id))?;
        *slot = product.clone();
        tx.save(Collection::Products, &products).await?;
        tx.commit().await?;

        info!(id = %product.id, "Product updated");
        Ok(product)
    }

    /// Removes product `id` and returns it. Past sales keep their snapshot.
    pub async fn delete(&self, id: &str) -> DbResult<Product> {
        let mut tx = self.store.begin().await?;
        let mut products: Vec<Product> = tx.load(Collection::Products, Product::demo_catalog).await?;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("el producto", id))?;
        let removed = products.remove(index);
        tx.save(Collection::Products, &products).await?;
        tx.commit().await?;

        info!(id = %id, name = %removed.name, "Product deleted");
        Ok(removed)
    }

    /// Replaces the whole catalog.
    pub async fn replace_all(&self, products: &[Product]) -> DbResult<()> {
        self.store.save(Collection::Products, products).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
