//! # Command Handlers
//!
//! One module per top-level subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog CRUD, search, low stock
//! ├── register.rs  ◄─── Interactive order session and checkout
//! ├── sale.rs      ◄─── Sales log, receipt reprint
//! ├── expense.rs   ◄─── Expense ledger
//! ├── report.rs    ◄─── Summary, rankings, monthly chart, CSV, advisor
//! └── config.rs    ◄─── Store identity and tax rate
//! ```
//!
//! ## Handler Shape
//! Each handler declares only the state it needs and writes to any
//! `std::io::Write`, which is stdout in the binary and a `Vec<u8>` in tests:
//! ```rust,ignore
//! // Only needs database
//! async fn run(db: &DbState, action: ExpenseCommand, out: &mut impl Write)
//!
//! // Needs database and store configuration
//! async fn run(db: &DbState, config: &StoreConfigState, action: SaleCommand, out: &mut impl Write)
//! ```

pub mod config;
pub mod expense;
pub mod product;
pub mod register;
pub mod report;
pub mod sale;
