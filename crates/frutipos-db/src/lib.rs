//! # frutipos-db: Storage Layer for FrutiPOS
//!
//! Persists the store's four collections in a local SQLite file and exposes
//! one repository per collection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FrutiPOS Data Flow                               │
//! │                                                                         │
//! │  CLI command (register checkout)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   frutipos-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_collec-  │  │   │
//! │  │   │               │    │ ExpenseRepo   │    │   tions.sql  │  │   │
//! │  │   │               │    │ ConfigRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                       CollectionStore (store.rs)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  collections table: frutipos_products │ frutipos_sales │ ...          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frutipos_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("frutipos.db")).await?;
//! let product = db.products().find_by_barcode("1001").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{Collection, CollectionStore};

pub use repository::config::ConfigRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
