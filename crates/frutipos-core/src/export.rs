//! # Sales Export
//!
//! CSV rendering of the sales log for spreadsheets.
//!
//! ## Format
//! ```text
//! ID Venta,Fecha,Total
//! 3f2a...,2026-10-19T15:30:00.000Z,5355.00
//! ```
//! One row per sale in log order. Dates are ISO-8601 UTC, totals are plain
//! decimals in pesos.

use chrono::SecondsFormat;

use crate::types::Sale;

/// Header row.
pub const SALES_CSV_HEADER: &str = "ID Venta,Fecha,Total";

/// Suggested file name for the export.
pub const SALES_CSV_FILENAME: &str = "ventas_frutipos.csv";

/// Renders the sales log as CSV. An empty log yields only the header.
pub fn sales_csv(sales: &[Sale]) -> String {
    let mut out = String::from(SALES_CSV_HEADER);
    for sale in sales {
        out.push('\n');
        out.push_str(&escape(&sale.id));
        out.push(',');
        out.push_str(&sale.date.to_rfc3339_opts(SecondsFormat::Millis, true));
        out.push(',');
        out.push_str(&sale.total_cents.to_decimal_string());
    }
    out.push('\n');
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
