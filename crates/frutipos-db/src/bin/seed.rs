//! # Seed Data Generator
//!
//! Fills a store with a demo catalog and a few months of sales and
//! expenses, so reports and the advisor have something to work with.
//!
//! ## Usage
//! ```bash
//! # 90 days of history (default)
//! cargo run -p frutipos-db --bin seed
//!
//! # Custom span and database
//! cargo run -p frutipos-db --bin seed -- --days 180 --db ./data/frutipos.db
//! ```
//!
//! History is appended without touching stock, so the catalog keeps the
//! demo stock levels.

use chrono::{Duration, Utc};
use frutipos_core::types::new_id;
use frutipos_core::{Cart, Expense, ExpenseType, Money, Product, TaxRate};
use frutipos_db::{Collection, Database, DbConfig};
use std::env;

/// Extra produce added on top of the demo catalog: (barcode, name, price, cost, stock, category).
const EXTRA_PRODUCTS: &[(&str, &str, i64, i64, i64, &str)] = &[
    ("1005", "Mango Tommy", 2500, 1300, 40, "Frutas"),
    ("1006", "Fresa 500g", 6000, 3800, 12, "Frutas"),
    ("1007", "Tomate Chonto", 900, 450, 60, "Verduras"),
    ("1008", "Cebolla Cabezona", 700, 300, 8, "Verduras"),
    ("1009", "Queso Campesino", 9500, 7200, 6, "Lácteos"),
    ("1010", "Arroz 1kg", 4200, 3500, 25, "Abarrotes"),
];

const EXPENSES: &[(&str, i64, ExpenseType)] = &[
    ("Compra en Corabastos", 350_000, ExpenseType::Purchase),
    ("Recibo de energía", 85_000, ExpenseType::Service),
    ("Bolsas y empaques", 18_000, ExpenseType::Other),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 90;
    let mut db_path = String::from("./frutipos_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(90);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("FrutiPOS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of sales history (default: 90)");
                println!("  -d, --db <PATH>    Database file path (default: ./frutipos_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("FrutiPOS Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");

    if db.store().contains(Collection::Sales).await? {
        println!("⚠ Database already has a sales log");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    let mut catalog = db.products().list().await?;
    for (barcode, name, price, cost, stock, category) in EXTRA_PRODUCTS {
        catalog.push(Product {
            id: new_id(),
            barcode: barcode.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price_cents: Money::from_pesos(*price),
            cost_cents: Money::from_pesos(*cost),
            stock: *stock,
        });
    }
    db.products().replace_all(&catalog).await?;
    println!("✓ Catalog has {} products", catalog.len());

    // Sales
    let tax_rate = db.config().get().await?.effective_tax_rate();
    let start = Utc::now() - Duration::days(days);
    let mut generated = 0usize;

    for day in 0..days {
        let sales_today = 2 + (day * 7 % 5) as usize;
        for n in 0..sales_today {
            let seed = (day as usize) * 31 + n * 17;
            let date = start + Duration::days(day) + Duration::minutes((8 * 60 + (seed % 600)) as i64);
            let sale = generate_sale(&catalog, seed, tax_rate, date)?;
            db.sales().append(&sale).await?;
            generated += 1;
        }

        if day % 7 == 0 {
            let (description, amount, kind) = EXPENSES[(day as usize / 7) % EXPENSES.len()];
            db.expenses()
                .append(&Expense {
                    id: new_id(),
                    date: start + Duration::days(day),
                    description: description.to_string(),
                    amount_cents: Money::from_pesos(amount),
                    kind,
                })
                .await?;
        }
    }

    println!("✓ Generated {} sales", generated);
    println!("✓ Generated {} expenses", db.expenses().list().await?.len());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one plausible sale of one to three products.
fn generate_sale(
    catalog: &[Product],
    seed: usize,
    tax_rate: TaxRate,
    date: chrono::DateTime<Utc>,
) -> Result<frutipos_core::Sale, frutipos_core::CoreError> {
    let mut cart = Cart::new();
    let lines = 1 + seed % 3;

    for line in 0..lines {
        let product = &catalog[(seed + line * 5) % catalog.len()];
        let units = 1 + (seed + line) % 4;
        for _ in 0..units {
            // Stop at the stock ceiling
            if cart.add_item(product).is_err() {
                break;
            }
        }
    }

    cart.prepare_checkout(tax_rate, new_id(), date)
}
