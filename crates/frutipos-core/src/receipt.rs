//! # Receipt Composition
//!
//! Builds the printable receipt for a committed sale and the message sent
//! to the client when they left an email.
//!
//! ```text
//!        La Frutería del Barrio
//!   Calle 123 # 45-67, Bogotá, Colombia
//!   NIT: 900.123.456-7
//!   Tel: 300 123 4567
//! ----------------------------------------
//! Factura: #000123
//! Fecha: 19/10/2026 15:30
//! ----------------------------------------
//! 3 x Manzana Roja                  $4.500
//! ----------------------------------------
//! Subtotal                          $4.500
//! IVA (19%)                           $855
//! TOTAL                             $5.355
//! ----------------------------------------
//!         ¡Gracias por su compra!
//!          Régimen Simplificado
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::money::Money;
use crate::types::{Sale, StoreConfig};

/// Width of the printed receipt in characters.
pub const RECEIPT_WIDTH: usize = 40;

/// One printed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub quantity: i64,
    pub name: String,
    pub line_total: Money,
}

/// Everything printed on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub store_name: String,
    pub address: String,
    pub phone: String,
    pub nit: String,
    pub number: String,
    pub date: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    /// Only present when tax was charged.
    pub tax: Option<Money>,
    /// Rate used for the label, as a percentage.
    pub tax_percentage: f64,
    pub total: Money,
}

impl Receipt {
    /// Composes the receipt for `sale` with the store identity in `config`.
    pub fn for_sale(sale: &Sale, config: &StoreConfig) -> Self {
        Receipt {
            store_name: config.name.clone(),
            address: config.address.clone(),
            phone: config.phone.clone(),
            nit: config.nit.clone(),
            number: sale.short_id().to_string(),
            date: sale.date,
            lines: sale
                .items
                .iter()
                .map(|item| ReceiptLine {
                    quantity: item.quantity,
                    name: item.product.name.clone(),
                    line_total: item.line_total(),
                })
                .collect(),
            subtotal: sale.subtotal_cents,
            tax: (!sale.tax_cents.is_zero()).then_some(sale.tax_cents),
            tax_percentage: config.effective_tax_rate().percentage(),
            total: sale.total_cents,
        }
    }

    /// Plain text rendering for the terminal or a thermal printer.
    pub fn render_text(&self) -> String {
        let rule = "-".repeat(RECEIPT_WIDTH);
        let mut out = Vec::new();

        out.push(center(&self.store_name));
        out.push(center(&self.address));
        out.push(center(&format!("NIT: {}", self.nit)));
        out.push(center(&format!("Tel: {}", self.phone)));
        out.push(rule.clone());
        out.push(format!("Factura: #{}", self.number));
        out.push(format!("Fecha: {}", self.date.format("%d/%m/%Y %H:%M")));
        out.push(rule.clone());

        for line in &self.lines {
            out.push(columns(
                &format!("{} x {}", line.quantity, line.name),
                &line.line_total.to_string(),
            ));
        }

        out.push(rule.clone());
        out.push(columns("Subtotal", &self.subtotal.to_string()));
        if let Some(tax) = self.tax {
            out.push(columns(
                &format!("IVA ({}%)", format_percentage(self.tax_percentage)),
                &tax.to_string(),
            ));
        }
        out.push(columns("TOTAL", &self.total.to_string()));
        out.push(rule);
        out.push(center("¡Gracias por su compra!"));
        out.push(center("Régimen Simplificado"));

        out.join("\n")
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= RECEIPT_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((RECEIPT_WIDTH - len) / 2), text)
}

fn columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = RECEIPT_WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

fn format_percentage(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{}", pct as i64)
    } else {
        format!("{:.2}", pct)
    }
}

// =============================================================================
// Client Notification
// =============================================================================

/// Email handed to the operator's mail client after a sale with a client
/// email. Composing it is all FrutiPOS does; delivery is external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientNotification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ClientNotification {
    /// `None` when the sale has no client email.
    pub fn for_sale(sale: &Sale, config: &StoreConfig) -> Option<Self> {
        let to = sale.client_email.clone()?;
        Some(ClientNotification {
            subject: format!("Factura de compra - {}", config.name),
            body: format!(
                "Hola,\n\nGracias por su compra en {}.\n\nTotal: {}\nFecha: {}\n\nAdjunto encontrará su factura.",
                config.name,
                sale.total_cents,
                sale.date.format("%d/%m/%Y"),
            ),
            to,
        })
    }

    /// `mailto:` link with percent-encoded subject and body.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            percent_encode(&self.subject),
            percent_encode(&self.body)
        )
    }
}

fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
