//! # Register Session
//!
//! The interactive order screen. One line in, one action out.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Register Session                                   │
//! │                                                                         │
//! │  > scan 1001            find_by_barcode ──► cart.add_item               │
//! │  > add 3                get_by_id ────────► cart.add_item               │
//! │  > qty 1 +2             cart.adjust_quantity (line number or id)        │
//! │  > remove 1             cart.remove_item                                │
//! │  > email ana@correo.co  cart.set_client_email                           │
//! │  > consent si           cart.set_consent                                │
//! │  > checkout                                                             │
//! │        │                                                                │
//! │        ├── 1. cart.prepare_checkout (empty? email? consent?)            │
//! │        ├── 2. sales().commit  (stock + sale in one transaction)         │
//! │        ├── 3. cart.complete_checkout                                    │
//! │        └── 4. print receipt (+ mailto link for the client)              │
//! │  > quit                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing line prints its error and the session continues; the cart
//! and the store are left as they were.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use frutipos_core::receipt::{ClientNotification, Receipt};
use frutipos_core::validation::validate_email;
use frutipos_core::{new_id, Cart, CartItem, OrderState};

use crate::error::{AppError, AppResult};
use crate::state::{CartState, DbState, StoreConfigState};

const HELP: &str = "\
Comandos:
  scan <código>           Agrega una unidad por código de barras
  add <id>                Agrega una unidad por id de producto
  qty <línea|id> <+n|-n>  Cambia la cantidad de una línea
  remove <línea|id>       Quita una línea
  show                    Muestra el pedido
  clear                   Vacía el pedido
  email [correo]          Correo del cliente (sin argumento lo borra)
  consent <si|no>         Autorización de tratamiento de datos
  checkout                Cobra y emite la factura
  help                    Esta ayuda
  quit                    Sale de la caja";

// =============================================================================
// Line Grammar
// =============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "register",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct RegisterLine {
    #[command(subcommand)]
    command: RegisterCommand,
}

#[derive(Debug, Subcommand)]
enum RegisterCommand {
    Scan {
        barcode: String,
    },
    Add {
        product_id: String,
    },
    Qty {
        line: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    #[command(alias = "rm")]
    Remove {
        line: String,
    },
    Show,
    Clear,
    Email {
        address: Option<String>,
    },
    Consent {
        #[arg(value_parser = parse_yes_no, action = clap::ArgAction::Set)]
        answer: bool,
    },
    #[command(alias = "pay")]
    Checkout,
    Help,
    #[command(alias = "exit")]
    Quit,
}

fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "si" | "sí" | "s" | "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected si or no, got '{}'", other)),
    }
}

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// =============================================================================
// Session
// =============================================================================

/// The state one register session works with.
pub struct RegisterSession<'a> {
    db: &'a DbState,
    cart: &'a CartState,
    config: &'a StoreConfigState,
    low_stock_threshold: i64,
}

impl<'a> RegisterSession<'a> {
    pub fn new(
        db: &'a DbState,
        cart: &'a CartState,
        config: &'a StoreConfigState,
        low_stock_threshold: i64,
    ) -> Self {
        RegisterSession {
            db,
            cart,
            config,
            low_stock_threshold,
        }
    }

    /// Runs one input line.
    pub async fn execute(&self, line: &str, out: &mut impl Write) -> AppResult<Flow> {
        let parsed = match RegisterLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) => {
                writeln!(out, "{}", e.render().to_string().trim_end())?;
                writeln!(out, "Escriba 'help' para ver los comandos")?;
                return Ok(Flow::Continue);
            }
        };

        debug!(command = ?parsed.command, "register command");

        match parsed.command {
            RegisterCommand::Scan { barcode } => {
                let product = self
                    .db
                    .inner()
                    .products()
                    .find_by_barcode(&barcode)
                    .await?
                    .ok_or_else(|| AppError::not_found("un producto con código", &barcode))?;
                self.add(&product, out)?;
            }
            RegisterCommand::Add { product_id } => {
                let product = self
                    .db
                    .inner()
                    .products()
                    .get_by_id(&product_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("el producto", &product_id))?;
                self.add(&product, out)?;
            }
            RegisterCommand::Qty { line, delta } => {
                let id = self.resolve_line(&line)?;
                let quantity = self.cart.with_cart_mut(|c| c.adjust_quantity(&id, delta))?;
                writeln!(out, "Cantidad: {}", quantity)?;
                self.write_totals(out)?;
            }
            RegisterCommand::Remove { line } => {
                let id = self.resolve_line(&line)?;
                if let Some(item) = self.cart.with_cart_mut(|c| c.remove_item(&id)) {
                    writeln!(out, "- {}", item.product.name)?;
                }
                self.write_totals(out)?;
            }
            RegisterCommand::Show => self.write_cart(out)?,
            RegisterCommand::Clear => {
                self.cart.with_cart_mut(Cart::clear);
                writeln!(out, "Pedido vacío")?;
            }
            RegisterCommand::Email { address } => match address {
                Some(address) => {
                    validate_email(address.trim())?;
                    self.cart.with_cart_mut(|c| c.set_client_email(Some(&address)));
                    writeln!(out, "Correo del cliente: {}", address.trim())?;
                    if !self.cart.with_cart(Cart::has_consent) {
                        writeln!(out, "Falta la autorización de datos: consent si")?;
                    }
                }
                None => {
                    self.cart.with_cart_mut(|c| c.set_client_email(None));
                    writeln!(out, "Correo del cliente borrado")?;
                }
            },
            RegisterCommand::Consent { answer } => {
                self.cart.with_cart_mut(|c| c.set_consent(answer));
                let label = if answer { "autorizado" } else { "no autorizado" };
                writeln!(out, "Tratamiento de datos: {}", label)?;
            }
            RegisterCommand::Checkout => self.checkout(out).await?,
            RegisterCommand::Help => writeln!(out, "{}", HELP)?,
            RegisterCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn add(&self, product: &frutipos_core::Product, out: &mut impl Write) -> AppResult<()> {
        self.cart.with_cart_mut(|c| c.add_item(product))?;

        let quantity = self.cart.with_cart(|c| {
            c.items()
                .iter()
                .find(|i| i.product_id() == product.id)
                .map(|i| i.quantity)
                .unwrap_or(0)
        });
        writeln!(out, "+ {} x{}", product.name, quantity)?;
        self.write_totals(out)?;
        Ok(())
    }

    /// A 1-based line number as shown by `show`, or a product id.
    fn resolve_line(&self, key: &str) -> AppResult<String> {
        self.cart.with_cart(|c| {
            let by_number = key
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| c.items().get(i));

            by_number
                .or_else(|| c.items().iter().find(|i| i.product_id() == key))
                .map(|i| i.product_id().to_string())
                .ok_or_else(|| AppError::from(frutipos_core::CoreError::NotInCart(key.to_string())))
        })
    }

    async fn checkout(&self, out: &mut impl Write) -> AppResult<()> {
        let tax_rate = self.config.tax_rate();
        let sale = self
            .cart
            .with_cart(|c| c.prepare_checkout(tax_rate, new_id(), Utc::now()))?;

        let updated = self.db.inner().sales().commit(&sale).await?;
        self.cart.with_cart_mut(|c| c.complete_checkout(sale.id.clone()));

        info!(
            sale_id = %sale.id,
            total = %sale.total_cents,
            lines = sale.items.len(),
            "Sale committed"
        );

        let store = self.config.get();
        writeln!(out, "{}", Receipt::for_sale(&sale, &store).render_text())?;

        if let Some(notification) = ClientNotification::for_sale(&sale, &store) {
            writeln!(out)?;
            writeln!(out, "Factura para {}:", notification.to)?;
            writeln!(out, "{}", notification.mailto_url())?;
        }

        let running_low: Vec<&str> = updated
            .iter()
            .filter(|p| sale.items.iter().any(|i| i.product_id() == p.id))
            .filter(|p| p.is_low_stock(self.low_stock_threshold))
            .map(|p| p.name.as_str())
            .collect();
        if !running_low.is_empty() {
            writeln!(out, "Stock bajo: {}", running_low.join(", "))?;
        }

        Ok(())
    }

    fn write_totals(&self, out: &mut impl Write) -> AppResult<()> {
        let totals = self.cart.with_cart(|c| c.totals(self.config.tax_rate()))?;
        writeln!(
            out,
            "  {} líneas, {} unid.  Subtotal {}  IVA {}  Total {}",
            totals.line_count, totals.total_quantity, totals.subtotal, totals.tax, totals.total
        )?;
        Ok(())
    }

    fn write_cart(&self, out: &mut impl Write) -> AppResult<()> {
        let (state, items, email, consent, last_sale) = self.cart.with_cart(|c| {
            (
                c.state(),
                c.items().to_vec(),
                c.client_email().map(str::to_string),
                c.has_consent(),
                c.last_sale_id().map(str::to_string),
            )
        });

        match state {
            OrderState::Empty => writeln!(out, "Pedido vacío")?,
            OrderState::Committed => writeln!(
                out,
                "Última venta: {}. Escanee un producto para iniciar otro pedido",
                last_sale.unwrap_or_default()
            )?,
            OrderState::Building => {
                for (n, item) in items.iter().enumerate() {
                    write_line(out, n + 1, item)?;
                }
                if let Some(email) = email {
                    let consent = if consent { "autorizado" } else { "sin autorización" };
                    writeln!(out, "  Cliente: {} ({})", email, consent)?;
                }
                self.write_totals(out)?;
            }
        }
        Ok(())
    }
}

fn write_line(out: &mut impl Write, number: usize, item: &CartItem) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>2}. {:<24} {:>4} x {:>9} = {:>10}",
        number,
        item.product.name,
        item.quantity,
        item.product.price_cents.to_string(),
        item.line_total().to_string()
    )
}

// =============================================================================
// Loop
// =============================================================================

/// Reads commands from `input` until `quit` or end of input.
pub async fn run<R>(session: &RegisterSession<'_>, input: R, out: &mut impl Write) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let store = session.config.get();
    writeln!(out, "{} · Caja abierta. Escriba 'help' para ver los comandos", store.name)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.execute(&line, out).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                warn!(code = ?e.code, "register command failed: {}", e.message);
                writeln!(out, "Error: {}", e.message)?;
            }
        }
    }

    if !session.cart.with_cart(Cart::is_empty) {
        writeln!(out, "Pedido sin cobrar descartado")?;
    }
    writeln!(out, "Caja cerrada")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<RegisterCommand, clap::Error> {
        RegisterLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    #[test]
    fn test_line_grammar() {
        assert!(matches!(parse("scan 1001").unwrap(), RegisterCommand::Scan { barcode } if barcode == "1001"));
        assert!(matches!(parse("qty 1 -2").unwrap(), RegisterCommand::Qty { delta: -2, .. }));
        assert!(matches!(parse("qty 1 +2").unwrap(), RegisterCommand::Qty { delta: 2, .. }));
        assert!(matches!(parse("email").unwrap(), RegisterCommand::Email { address: None }));
        assert!(matches!(parse("consent sí").unwrap(), RegisterCommand::Consent { answer: true }));
        assert!(matches!(parse("exit").unwrap(), RegisterCommand::Quit));
        assert!(parse("consent quizas").is_err());
        assert!(parse("fly").is_err());
    }

    #[test]
    fn test_line_parser_definition() {
        use clap::CommandFactory;
        RegisterLine::command().debug_assert();
    }

    #[test]
    fn test_consent_takes_exactly_one_answer() {
        assert!(matches!(parse("consent si").unwrap(), RegisterCommand::Consent { answer: true }));
        assert!(matches!(parse("consent no").unwrap(), RegisterCommand::Consent { answer: false }));
        assert!(parse("consent").is_err());
        assert!(parse("consent si no").is_err());
    }
}
