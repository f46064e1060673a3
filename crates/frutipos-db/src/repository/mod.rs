//! # Repository Module
//!
//! One repository per collection, each a thin typed layer over
//! [`CollectionStore`](crate::store::CollectionStore).
//!
//! ```text
//! CLI command
//!      │  db.products().find_by_barcode("1001")
//!      ▼
//! ProductRepository ── load / save ──► CollectionStore ──► collections table
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD, scan and search
//! - [`SaleRepository`](sale::SaleRepository) - Sales log and atomic checkout commit
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expense log
//! - [`ConfigRepository`](config::ConfigRepository) - Store configuration

pub mod config;
pub mod expense;
pub mod product;
pub mod sale;
