//! # Command Line
//!
//! ```text
//! frutipos [--config FILE] [--db FILE] <COMMAND>
//!
//!   product   list | search | add | edit | delete | low-stock
//!   register  interactive order session
//!   sale      list | receipt
//!   expense   list | add
//!   report    summary | top | monthly | export | advise
//!   config    show | set
//! ```
//!
//! Money arguments are plain text and go through the same coercion as the
//! forms they replace: anything unparseable counts as zero.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use frutipos_core::{ExpenseType, TOP_PRODUCTS_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "frutipos", version, about = "Point of sale for a neighborhood fruit shop")]
pub struct Cli {
    /// Settings file (default: frutipos.toml in the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database file, overrides settings and FRUTIPOS_DB_PATH
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the product catalog
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },

    /// Open the register and ring up orders
    Register,

    /// Browse committed sales
    Sale {
        #[command(subcommand)]
        action: SaleCommand,
    },

    /// Record and list expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseCommand,
    },

    /// Financial reports
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },

    /// Store identity and tax rate
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List the whole catalog
    List,

    /// Search by name or barcode
    Search { query: String },

    /// Add a product
    Add(NewProductArgs),

    /// Edit a product; omitted fields keep their value
    Edit {
        id: String,

        #[command(flatten)]
        fields: EditProductArgs,
    },

    /// Delete a product. Past sales keep their copy
    Delete { id: String },

    /// Products running low on stock
    LowStock {
        /// Overrides the configured threshold
        #[arg(long)]
        threshold: Option<i64>,
    },
}

#[derive(Debug, Args)]
pub struct NewProductArgs {
    #[arg(long)]
    pub barcode: String,

    #[arg(long)]
    pub name: String,

    /// Defaults to Frutas
    #[arg(long, default_value = "")]
    pub category: String,

    /// Sale price in pesos
    #[arg(long)]
    pub price: String,

    /// Unit cost in pesos
    #[arg(long, default_value = "0")]
    pub cost: String,

    #[arg(long, default_value = "0")]
    pub stock: String,
}

#[derive(Debug, Args)]
pub struct EditProductArgs {
    #[arg(long)]
    pub barcode: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub cost: Option<String>,

    #[arg(long)]
    pub stock: Option<String>,
}

// =============================================================================
// Sale / Expense
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// List sales, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the receipt of a sale (full id or the 6-character short id)
    Receipt { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// List expenses, newest first
    List,

    /// Record an expense
    Add {
        #[arg(long)]
        description: String,

        /// Amount in pesos
        #[arg(long)]
        amount: String,

        /// purchase | service | other
        #[arg(long = "type", default_value = "other")]
        kind: ExpenseType,
    },
}

// =============================================================================
// Report / Config
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Revenue, cost of goods, expenses and net profit
    Summary,

    /// Best-selling products by units
    Top {
        #[arg(long, default_value_t = TOP_PRODUCTS_LIMIT)]
        limit: usize,
    },

    /// Revenue per month
    Monthly,

    /// Write every sale to a CSV file
    Export {
        /// Defaults to ventas_frutipos.csv in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Ask the advisory service for tips
    Advise,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the store configuration
    Show,

    /// Change fields of the store configuration
    Set(ConfigFields),
}

#[derive(Debug, Default, Args)]
pub struct ConfigFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Decimal fraction, 0.19 for 19%
    #[arg(long)]
    pub tax_rate: Option<f64>,

    #[arg(long)]
    pub nit: Option<String>,

    /// Empty string removes the logo
    #[arg(long)]
    pub logo_url: Option<String>,
}
