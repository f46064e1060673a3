//! # CLI State
//!
//! State shared by the command handlers.
//!
//! ## State Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         State Objects                                   │
//! │                                                                         │
//! │  DbState            The open store (products, sales, expenses, config) │
//! │  CartState          The order being rung up in the register session    │
//! │  StoreConfigState   Cached store identity and tax rate, write-through  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each handler takes only the state it needs.

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::StoreConfigState;
pub use db::DbState;
