//! # Sale Commands
//!
//! Read-only access to the sales log. Sales are created only by the
//! register's checkout.

use std::io::Write;

use frutipos_core::receipt::Receipt;
use frutipos_core::Sale;

use crate::cli::SaleCommand;
use crate::error::{AppError, AppResult};
use crate::state::{DbState, StoreConfigState};

pub async fn run(
    db: &DbState,
    config: &StoreConfigState,
    action: SaleCommand,
    out: &mut impl Write,
) -> AppResult<()> {
    match action {
        SaleCommand::List { limit } => {
            let sales = db.inner().sales().list().await?;
            if sales.is_empty() {
                writeln!(out, "Aún no hay ventas registradas")?;
                return Ok(());
            }

            writeln!(out, "{:<8} {:<17} {:>6} {:>12}", "FACTURA", "FECHA", "UNID.", "TOTAL")?;
            let shown = limit.unwrap_or(sales.len());
            for sale in sales.iter().rev().take(shown) {
                writeln!(
                    out,
                    "#{:<7} {:<17} {:>6} {:>12}",
                    sale.short_id(),
                    sale.date.format("%d/%m/%Y %H:%M"),
                    sale.total_quantity(),
                    sale.total_cents.to_string()
                )?;
            }
        }
        SaleCommand::Receipt { id } => {
            let sale = find_sale(db, &id).await?;
            let receipt = Receipt::for_sale(&sale, &config.get());
            writeln!(out, "{}", receipt.render_text())?;
        }
    }

    Ok(())
}

/// Looks a sale up by full id, then by the short id printed on receipts.
/// The newest sale wins when several share a short id.
pub async fn find_sale(db: &DbState, id: &str) -> AppResult<Sale> {
    let id = id.trim().trim_start_matches('#');
    let sales = db.inner().sales();

    if let Some(sale) = sales.get_by_id(id).await? {
        return Ok(sale);
    }

    sales
        .list()
        .await?
        .into_iter()
        .rev()
        .find(|s| s.short_id() == id)
        .ok_or_else(|| AppError::not_found("la venta", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use frutipos_core::{Cart, Product, TaxRate};
    use frutipos_db::{Database, DbConfig};

    async fn db_with_sale(id: &str) -> DbState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = Product::demo_catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog[1]).unwrap();
        let sale = cart.prepare_checkout(TaxRate::zero(), id, Utc::now()).unwrap();
        db.sales().commit(&sale).await.unwrap();
        DbState::new(db)
    }

    #[tokio::test]
    async fn test_find_sale_by_short_id() {
        let db = db_with_sale("0b7c6d2e-aaaa-bbbb-cccc-1234567890ab").await;

        let sale = find_sale(&db, "#7890ab").await.unwrap();
        assert_eq!(sale.id, "0b7c6d2e-aaaa-bbbb-cccc-1234567890ab");

        let err = find_sale(&db, "zzzzzz").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_receipt_prints_store_header() {
        let db = db_with_sale("venta-000123").await;
        let config = StoreConfigState::default();
        let mut out = Vec::new();

        run(&db, &config, SaleCommand::Receipt { id: "000123".into() }, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("La Frutería del Barrio"));
        assert!(text.contains("Banano Criollo"));
        assert!(text.contains("¡Gracias por su compra!"));
    }
}
