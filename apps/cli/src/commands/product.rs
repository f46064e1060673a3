//! # Product Commands
//!
//! Catalog maintenance from the command line.
//!
//! ## Edit Workflow
//! ```text
//! frutipos product edit 3 --price 1800
//!        │
//!        ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │  1. Load product 3 (NotFound if missing)                       │
//! │  2. Turn it into a draft, overlay the given fields             │
//! │  3. Validate the draft and replace the product                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Edits never touch committed sales; each sale keeps the product copy it
//! was rung up with.

use std::io::Write;
use tracing::debug;

use frutipos_core::{Product, ProductDraft};

use crate::cli::{EditProductArgs, NewProductArgs, ProductCommand};
use crate::error::AppResult;
use crate::settings::Settings;
use crate::state::DbState;

pub async fn run(
    db: &DbState,
    settings: &Settings,
    action: ProductCommand,
    out: &mut impl Write,
) -> AppResult<()> {
    let products = db.inner().products();

    match action {
        ProductCommand::List => {
            let list = products.list().await?;
            write_table(out, &list)?;
        }
        ProductCommand::Search { query } => {
            debug!(query = %query, "product search");
            let found = products.search(&query).await?;
            if found.is_empty() {
                writeln!(out, "No hay productos que coincidan con \"{}\"", query.trim())?;
            } else {
                write_table(out, &found)?;
            }
        }
        ProductCommand::Add(args) => {
            let product = products.insert(new_draft(args)).await?;
            writeln!(out, "Producto creado: {} ({})", product.name, product.id)?;
        }
        ProductCommand::Edit { id, fields } => {
            let current = products
                .get_by_id(&id)
                .await?
                .ok_or_else(|| crate::error::AppError::not_found("el producto", &id))?;
            let product = products.update(&id, edit_draft(&current, fields)).await?;
            writeln!(out, "Producto actualizado: {}", product.name)?;
        }
        ProductCommand::Delete { id } => {
            let removed = products.delete(&id).await?;
            writeln!(out, "Producto eliminado: {}", removed.name)?;
        }
        ProductCommand::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(settings.low_stock_threshold);
            let low = products.low_stock(threshold).await?;
            if low.is_empty() {
                writeln!(out, "Inventario saludable (ningún producto bajo {})", threshold)?;
            } else {
                writeln!(out, "Productos con stock bajo (< {}):", threshold)?;
                for product in &low {
                    writeln!(out, "  {:<28} {:>5} unid.", product.name, product.stock)?;
                }
            }
        }
    }

    Ok(())
}

fn new_draft(args: NewProductArgs) -> ProductDraft {
    ProductDraft {
        barcode: args.barcode,
        name: args.name,
        category: args.category,
        price: args.price,
        cost: args.cost,
        stock: args.stock,
    }
}

/// The current product as a draft with the given fields replaced.
fn edit_draft(current: &Product, fields: EditProductArgs) -> ProductDraft {
    let base = ProductDraft::from(current);
    ProductDraft {
        barcode: fields.barcode.unwrap_or(base.barcode),
        name: fields.name.unwrap_or(base.name),
        category: fields.category.unwrap_or(base.category),
        price: fields.price.unwrap_or(base.price),
        cost: fields.cost.unwrap_or(base.cost),
        stock: fields.stock.unwrap_or(base.stock),
    }
}

fn write_table(out: &mut impl Write, products: &[Product]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<14} {:<24} {:<11} {:>10} {:>10} {:>6}",
        "ID", "CÓDIGO", "NOMBRE", "CATEGORÍA", "PRECIO", "COSTO", "STOCK"
    )?;
    for p in products {
        writeln!(
            out,
            "{:<8} {:<14} {:<24} {:<11} {:>10} {:>10} {:>6}",
            short(&p.id),
            p.barcode,
            p.name,
            p.category,
            p.price_cents.to_string(),
            p.cost_cents.to_string(),
            p.stock
        )?;
    }
    Ok(())
}

/// First 8 characters of an id, enough to tell UUIDs apart on screen.
fn short(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frutipos_db::{Database, DbConfig};

    async fn state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[test]
    fn test_edit_draft_keeps_omitted_fields() {
        let papaya = Product::demo_catalog().remove(2);
        let draft = edit_draft(
            &papaya,
            EditProductArgs {
                barcode: None,
                name: None,
                category: None,
                price: Some("4000".to_string()),
                cost: None,
                stock: None,
            },
        );

        let edited = draft.into_product(papaya.id.clone()).unwrap();
        assert_eq!(edited.price_cents.pesos(), 4000);
        assert_eq!(edited.cost_cents, papaya.cost_cents);
        assert_eq!(edited.stock, papaya.stock);
    }

    #[tokio::test]
    async fn test_low_stock_uses_settings_threshold() {
        let db = state().await;
        let settings = Settings {
            low_stock_threshold: 16,
            ..Settings::default()
        };
        let mut out = Vec::new();

        run(&db, &settings, ProductCommand::LowStock { threshold: None }, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Papaya"));
        assert!(!text.contains("Banano"));
    }

    #[tokio::test]
    async fn test_edit_unknown_product_is_not_found() {
        let db = state().await;
        let mut out = Vec::new();
        let err = run(
            &db,
            &Settings::default(),
            ProductCommand::Edit {
                id: "nope".to_string(),
                fields: EditProductArgs {
                    barcode: None,
                    name: Some("X".to_string()),
                    category: None,
                    price: None,
                    cost: None,
                    stock: None,
                },
            },
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
