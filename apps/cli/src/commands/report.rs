//! # Report Commands
//!
//! Everything here is computed on demand from the full history; nothing is
//! cached or persisted.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales log ─────┐                                                       │
//! │  expense log ───┼──► frutipos_core::finance ──► summary / top / monthly │
//! │  catalog ───────┘            │                                          │
//! │                              └──► BusinessSnapshot ──► Advisor          │
//! │                                   (aggregates only)     (advise)        │
//! │  sales log ─────────► export::sales_csv ──► ventas_frutipos.csv         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use frutipos_advisor::{Advisor, BusinessSnapshot};
use frutipos_core::export::{sales_csv, SALES_CSV_FILENAME};
use frutipos_core::finance::{monthly_revenue, top_products};
use frutipos_core::{FinancialSummary, Money};

use crate::cli::ReportCommand;
use crate::error::AppResult;
use crate::settings::Settings;
use crate::state::DbState;

/// Width of the longest bar in the monthly chart.
const CHART_WIDTH: usize = 30;

pub async fn run(
    db: &DbState,
    settings: &Settings,
    advisor: &Advisor,
    action: ReportCommand,
    out: &mut impl Write,
) -> AppResult<()> {
    let db = db.inner();

    match action {
        ReportCommand::Summary => {
            let sales = db.sales().list().await?;
            let expenses = db.expenses().list().await?;
            write_summary(out, &FinancialSummary::compute(&sales, &expenses))?;
        }
        ReportCommand::Top { limit } => {
            let sales = db.sales().list().await?;
            let ranking = top_products(&sales, limit);
            if ranking.is_empty() {
                writeln!(out, "Aún no hay ventas registradas")?;
            }
            for (pos, entry) in ranking.iter().enumerate() {
                writeln!(out, "{:>2}. {:<28} {:>6} unid.", pos + 1, entry.name, entry.quantity)?;
            }
        }
        ReportCommand::Monthly => {
            let sales = db.sales().list().await?;
            let months = monthly_revenue(&sales);
            let max = months.iter().map(|m| m.total).max().unwrap_or_default();
            for month in &months {
                writeln!(
                    out,
                    "{:<5} {:<width$} {}",
                    month.month,
                    bar(month.total, max),
                    month.total,
                    width = CHART_WIDTH
                )?;
            }
        }
        ReportCommand::Export { output } => {
            let sales = db.sales().list().await?;
            let path = output.unwrap_or_else(|| PathBuf::from(SALES_CSV_FILENAME));
            std::fs::write(&path, sales_csv(&sales))?;

            info!(path = %path.display(), rows = sales.len(), "Sales exported");
            writeln!(out, "{} ventas exportadas a {}", sales.len(), path.display())?;
        }
        ReportCommand::Advise => {
            let sales = db.sales().list().await?;
            let expenses = db.expenses().list().await?;
            let products = db.products().list().await?;
            let snapshot = BusinessSnapshot::from_history(
                &sales,
                &expenses,
                &products,
                settings.low_stock_threshold,
            );

            writeln!(out, "Consultando al asesor inteligente...")?;
            let report = advisor.analyze(&snapshot).await;
            // Provider output is untrusted and only ever shown as plain text
            writeln!(out, "{}", report.plain_text())?;
        }
    }

    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &FinancialSummary) -> std::io::Result<()> {
    writeln!(out, "Ingresos totales      {:>14}", summary.revenue.to_string())?;
    writeln!(out, "Costo de ventas       {:>14}", summary.cogs.to_string())?;
    writeln!(out, "Gastos operativos     {:>14}", summary.expenses.to_string())?;
    writeln!(out, "{}", "-".repeat(36))?;
    writeln!(out, "Utilidad neta         {:>14}", summary.net_profit.to_string())?;
    writeln!(out, "Transacciones         {:>14}", summary.transaction_count)?;
    if summary.is_loss() {
        writeln!(out, "Atención: el negocio está en pérdida")?;
    }
    Ok(())
}

/// `#` bar proportional to `value / max`.
fn bar(value: Money, max: Money) -> String {
    if !max.is_positive() || !value.is_positive() {
        return String::new();
    }
    let len = (value.cents() as i128 * CHART_WIDTH as i128 / max.cents() as i128) as usize;
    "#".repeat(len.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        let max = Money::from_pesos(1000);
        assert_eq!(bar(max, max).len(), CHART_WIDTH);
        assert_eq!(bar(Money::from_pesos(500), max).len(), CHART_WIDTH / 2);
        assert_eq!(bar(Money::from_pesos(1), max).len(), 1);
        assert_eq!(bar(Money::zero(), max), "");
        assert_eq!(bar(Money::zero(), Money::zero()), "");
    }

    #[test]
    fn test_summary_flags_loss() {
        let summary = FinancialSummary {
            revenue: Money::from_pesos(1000),
            cogs: Money::from_pesos(600),
            expenses: Money::from_pesos(900),
            net_profit: Money::from_pesos(-500),
            transaction_count: 1,
        };
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-$500"));
        assert!(text.contains("pérdida"));
    }
}
