//! # Business Snapshot
//!
//! The compact summary sent to the provider. Only aggregates leave the
//! machine: totals, a count and the names of products running low.

use frutipos_core::finance::{low_stock, total_expenses, total_revenue};
use frutipos_core::{Expense, Money, Product, Sale};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessSnapshot {
    pub total_sales: Money,
    pub total_expenses: Money,
    pub low_stock: Vec<String>,
    pub transaction_count: usize,
}

impl BusinessSnapshot {
    /// Summarizes the full history. Products with stock below
    /// `low_stock_threshold` are listed by name.
    pub fn from_history(
        sales: &[Sale],
        expenses: &[Expense],
        products: &[Product],
        low_stock_threshold: i64,
    ) -> Self {
        BusinessSnapshot {
            total_sales: total_revenue(sales),
            total_expenses: total_expenses(expenses),
            low_stock: low_stock(products, low_stock_threshold)
                .into_iter()
                .map(|p| p.name.clone())
                .collect(),
            transaction_count: sales.len(),
        }
    }

    /// The prompt, in Spanish, asking for three short tips as simple HTML.
    pub fn build_prompt(&self) -> String {
        let low_stock = if self.low_stock.is_empty() {
            "Ninguno".to_string()
        } else {
            self.low_stock.join(", ")
        };

        format!(
            "Actúa como un consultor experto de negocios para una frutería pequeña.\n\
             Analiza los siguientes datos resumidos:\n\
             - Ventas Totales Históricas: {}\n\
             - Gastos Totales Históricos: {}\n\
             - Productos con stock bajo: {}\n\
             - Cantidad de transacciones: {}\n\
             \n\
             Dame 3 consejos breves y estratégicos en español para mejorar la rentabilidad, \
             gestionar el inventario y aumentar las ventas.\n\
             Usa formato HTML simple (p, ul, li, strong) para la respuesta.",
            self.total_sales, self.total_expenses, low_stock, self.transaction_count
        )
    }
}
