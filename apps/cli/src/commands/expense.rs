use std::io::Write;

use frutipos_core::finance::total_expenses;
use frutipos_core::ExpenseDraft;

use crate::cli::ExpenseCommand;
use crate::error::AppResult;
use crate::state::DbState;

/// Expense ledger: append-only, listed newest first.
pub async fn run(db: &DbState, action: ExpenseCommand, out: &mut impl Write) -> AppResult<()> {
    let expenses = db.inner().expenses();

    match action {
        ExpenseCommand::List => {
            let list = expenses.list_newest_first().await?;
            if list.is_empty() {
                writeln!(out, "No hay gastos registrados")?;
                return Ok(());
            }

            writeln!(out, "{:<11} {:<17} {:<30} {:>12}", "FECHA", "TIPO", "DESCRIPCIÓN", "MONTO")?;
            for e in &list {
                writeln!(
                    out,
                    "{:<11} {:<17} {:<30} {:>12}",
                    e.date.format("%d/%m/%Y"),
                    e.kind.label(),
                    e.description,
                    e.amount_cents.to_string()
                )?;
            }
            writeln!(out, "Total gastos: {}", total_expenses(&list))?;
        }
        ExpenseCommand::Add {
            description,
            amount,
            kind,
        } => {
            let expense = expenses
                .record(ExpenseDraft {
                    description,
                    amount,
                    kind,
                })
                .await?;
            writeln!(
                out,
                "Gasto registrado: {} ({}, {})",
                expense.description,
                expense.amount_cents,
                expense.kind.label()
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frutipos_core::ExpenseType;
    use frutipos_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_add_then_list() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let mut out = Vec::new();

        run(
            &db,
            ExpenseCommand::Add {
                description: "Factura de luz".into(),
                amount: "85000".into(),
                kind: ExpenseType::Service,
            },
            &mut out,
        )
        .await
        .unwrap();
        run(&db, ExpenseCommand::List, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Gasto registrado: Factura de luz ($85.000, Servicios)"));
        assert!(text.contains("Total gastos: $85.000"));
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let mut out = Vec::new();

        let err = run(
            &db,
            ExpenseCommand::Add {
                description: "Bolsas".into(),
                amount: "abc".into(),
                kind: ExpenseType::Other,
            },
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
        assert!(db.inner().expenses().list().await.unwrap().is_empty());
    }
}
