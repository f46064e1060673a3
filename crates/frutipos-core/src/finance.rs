//! # Financial Aggregation
//!
//! Derived figures over the sales and expense logs. Nothing here is stored;
//! every figure is recomputed from the full history on demand.
//!
//! ## Profit and Loss
//! ```text
//!   revenue   = Σ sale.total            (tax included)
//!   cogs      = Σ item.cost × item.qty  (snapshotted costs)
//!   expenses  = Σ expense.amount
//!   ─────────────────────────────────
//!   net       = revenue − cogs − expenses
//! ```

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;
use crate::types::{Expense, Product, Sale};

// =============================================================================
// Totals
// =============================================================================

/// Sum of sale totals.
pub fn total_revenue(sales: &[Sale]) -> Money {
    sales.iter().map(|s| s.total_cents).sum()
}

/// Sum of snapshotted cost × quantity over every sold line.
pub fn total_cogs(sales: &[Sale]) -> Money {
    sales.iter().map(Sale::cogs).sum()
}

/// Sum of expense amounts.
pub fn total_expenses(expenses: &[Expense]) -> Money {
    expenses.iter().map(|e| e.amount_cents).sum()
}

/// Profit and loss summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub revenue: Money,
    pub cogs: Money,
    pub expenses: Money,
    pub net_profit: Money,
    pub transaction_count: usize,
}

impl FinancialSummary {
    pub fn compute(sales: &[Sale], expenses: &[Expense]) -> Self {
        let revenue = total_revenue(sales);
        let cogs = total_cogs(sales);
        let expenses = total_expenses(expenses);

        FinancialSummary {
            revenue,
            cogs,
            expenses,
            net_profit: revenue - cogs - expenses,
            transaction_count: sales.len(),
        }
    }

    /// Whether the period lost money.
    pub fn is_loss(&self) -> bool {
        self.net_profit.is_negative()
    }
}

// =============================================================================
// Rankings
// =============================================================================

/// Units sold of one product, keyed by its snapshotted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub name: String,
    pub quantity: i64,
}

/// Best sellers by units, descending.
///
/// Lines are grouped by the name captured at sale time, so a product renamed
/// later shows up under both names. Ties keep the order in which the names
/// were first seen in the log.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<ProductRanking> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranking: Vec<ProductRanking> = Vec::new();

    for item in sales.iter().flat_map(|s| s.items.iter()) {
        let name = item.product.name.as_str();
        match index.get(name) {
            Some(&i) => ranking[i].quantity += item.quantity,
            None => {
                index.insert(name, ranking.len());
                ranking.push(ProductRanking {
                    name: name.to_string(),
                    quantity: item.quantity,
                });
            }
        }
    }

    // sort_by is stable, which preserves first-seen order on ties
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking.truncate(limit);
    ranking
}

/// Catalog entries with stock strictly below `threshold`.
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock(threshold)).collect()
}

// =============================================================================
// Monthly Revenue
// =============================================================================

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Short Spanish month label (`ene`, `feb`, ...).
    pub month: String,
    pub total: Money,
}

const MONTH_LABELS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Short Spanish label for the month of `date`, in UTC.
pub fn month_label(date: &DateTime<Utc>) -> &'static str {
    MONTH_LABELS[date.month0() as usize]
}

/// Sale totals grouped by month label.
///
/// Buckets appear in the order their month is first seen in `sales`. The
/// label carries no year, so the same month of different years is merged.
pub fn monthly_revenue(sales: &[Sale]) -> Vec<MonthlyRevenue> {
    let mut buckets: Vec<MonthlyRevenue> = Vec::new();

    for sale in sales {
        let label = month_label(&sale.date);
        match buckets.iter_mut().find(|b| b.month == label) {
            Some(bucket) => bucket.total += sale.total_cents,
            None => buckets.push(MonthlyRevenue {
                month: label.to_string(),
                total: sale.total_cents,
            }),
        }
    }

    buckets
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::ExpenseType;
    use chrono::TimeZone;

    fn line(name: &str, price: i64, cost: i64, quantity: i64) -> CartItem {
        CartItem {
            product: Product {
                id: name.to_string(),
                barcode: name.to_string(),
                name: name.to_string(),
                category: "Frutas".to_string(),
                price_cents: Money::from_pesos(price),
                cost_cents: Money::from_pesos(cost),
                stock: 100,
            },
            quantity,
        }
    }

    fn sale(id: &str, month: u32, items: Vec<CartItem>) -> Sale {
        let subtotal: Money = items.iter().map(CartItem::line_total).sum();
        Sale {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(2026, month, 10, 12, 0, 0).unwrap(),
            items,
            subtotal_cents: subtotal,
            tax_cents: Money::zero(),
            total_cents: subtotal,
            client_email: None,
        }
    }

    fn expense(amount: i64) -> Expense {
        Expense {
            id: "e".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
            description: "Arriendo".to_string(),
            amount_cents: Money::from_pesos(amount),
            kind: ExpenseType::Service,
        }
    }

    #[test]
    fn test_summary() {
        let sales = vec![
            sale("s1", 1, vec![line("A", 1500, 800, 3)]),
            sale("s2", 1, vec![line("B", 500, 200, 4)]),
        ];
        let expenses = vec![expense(1000)];

        let summary = FinancialSummary::compute(&sales, &expenses);
        assert_eq!(summary.revenue, Money::from_pesos(6500));
        assert_eq!(summary.cogs, Money::from_pesos(3200));
        assert_eq!(summary.expenses, Money::from_pesos(1000));
        assert_eq!(summary.net_profit, Money::from_pesos(2300));
        assert_eq!(summary.transaction_count, 2);
        assert!(!summary.is_loss());
    }

    #[test]
    fn test_summary_empty_history() {
        let summary = FinancialSummary::compute(&[], &[]);
        assert!(summary.revenue.is_zero());
        assert!(summary.net_profit.is_zero());
        assert_eq!(summary.transaction_count, 0);
    }

    #[test]
    fn test_summary_loss_is_negative() {
        let summary = FinancialSummary::compute(&[], &[expense(5000)]);
        assert_eq!(summary.net_profit, Money::from_pesos(-5000));
        assert!(summary.is_loss());
    }

    #[test]
    fn test_top_products_aggregates_across_sales() {
        let sales = vec![
            sale("s1", 1, vec![line("A", 100, 50, 2), line("B", 100, 50, 1)]),
            sale("s2", 1, vec![line("A", 100, 50, 1)]),
        ];

        let top = top_products(&sales, 5);
        assert_eq!(
            top,
            vec![
                ProductRanking { name: "A".to_string(), quantity: 3 },
                ProductRanking { name: "B".to_string(), quantity: 1 },
            ]
        );
    }

    #[test]
    fn test_top_products_ties_keep_first_seen_order() {
        let sales = vec![
            sale("s1", 1, vec![line("C", 100, 50, 2)]),
            sale("s2", 1, vec![line("A", 100, 50, 2), line("B", 100, 50, 5)]),
        ];

        let names: Vec<_> = top_products(&sales, 5).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_top_products_limit() {
        let sales: Vec<Sale> = (1..=7)
            .map(|i| sale(&format!("s{}", i), 1, vec![line(&format!("P{}", i), 100, 50, i)]))
            .collect();

        let top = top_products(&sales, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "P7");
    }

    #[test]
    fn test_monthly_revenue_first_seen_order() {
        let sales = vec![
            sale("s1", 3, vec![line("A", 1000, 0, 1)]),
            sale("s2", 1, vec![line("A", 2000, 0, 1)]),
            sale("s3", 3, vec![line("A", 500, 0, 1)]),
        ];

        let months = monthly_revenue(&sales);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "mar");
        assert_eq!(months[0].total, Money::from_pesos(1500));
        assert_eq!(months[1].month, "ene");
    }

    #[test]
    fn test_month_label_september() {
        let date = Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 0).unwrap();
        assert_eq!(month_label(&date), "sept");
    }

    #[test]
    fn test_low_stock() {
        let catalog = Product::demo_catalog();
        let low = low_stock(&catalog, 16);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Papaya");
    }
}
