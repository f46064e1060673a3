//! Scripted register sessions against an in-memory store.

use frutipos_cli::commands::register::{self, Flow, RegisterSession};
use frutipos_cli::state::{CartState, DbState, StoreConfigState};
use frutipos_db::{Database, DbConfig};

async fn setup(tax_rate: f64) -> (DbState, StoreConfigState) {
    let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
    let config = StoreConfigState::load(db.inner()).await.unwrap();
    config.update(db.inner(), |c| c.tax_rate = tax_rate).await.unwrap();
    (db, config)
}

async fn play(session: &RegisterSession<'_>, script: &str) -> String {
    let mut out = Vec::new();
    register::run(session, script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn checkout_prints_receipt_and_decrements_stock() {
    let (db, config) = setup(0.19).await;
    let cart = CartState::new();
    let session = RegisterSession::new(&db, &cart, &config, 10);

    let output = play(&session, "scan 1001\nscan 1001\nqty 1 +1\ncheckout\nquit\n").await;

    assert!(output.contains("Subtotal"));
    assert!(output.contains("$4.500"));
    assert!(output.contains("IVA (19%)"));
    assert!(output.contains("$855"));
    assert!(output.contains("$5.355"));
    assert!(output.contains("¡Gracias por su compra!"));
    assert!(output.contains("Caja cerrada"));

    let apple = db.inner().products().get_by_id("1").await.unwrap().unwrap();
    assert_eq!(apple.stock, 47);

    let sales = db.inner().sales().list().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].total_cents.pesos(), 5355);
}

#[tokio::test]
async fn errors_do_not_end_the_session() {
    let (db, config) = setup(0.0).await;
    let cart = CartState::new();
    let session = RegisterSession::new(&db, &cart, &config, 10);

    let output = play(&session, "checkout\nscan 9999\nfly away\nshow\nquit\n").await;

    assert!(output.contains("Error: El pedido está vacío"));
    assert!(output.contains("Error: No se encontró un producto con código 9999"));
    assert!(output.contains("Escriba 'help'"));
    assert!(output.contains("Pedido vacío"));
    assert!(db.inner().sales().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn email_requires_consent_before_checkout() {
    let (db, config) = setup(0.0).await;
    let cart = CartState::new();
    let session = RegisterSession::new(&db, &cart, &config, 10);
    let mut out = Vec::new();

    session.execute("scan 1003", &mut out).await.unwrap();
    session.execute("email ana@correo.co", &mut out).await.unwrap();

    let err = session.execute("checkout", &mut out).await.unwrap_err();
    assert_eq!(err.code, frutipos_cli::ErrorCode::CartError);
    assert!(db.inner().sales().list().await.unwrap().is_empty());

    session.execute("consent si", &mut out).await.unwrap();
    let flow = session.execute("checkout", &mut out).await.unwrap();
    assert_eq!(flow, Flow::Continue);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("mailto:ana@correo.co?subject=Factura%20de%20compra"));

    let sales = db.inner().sales().list().await.unwrap();
    assert_eq!(sales[0].client_email.as_deref(), Some("ana@correo.co"));
}

#[tokio::test]
async fn checkout_with_consented_email_sends_receipt_link() {
    let (db, config) = setup(0.19).await;
    let cart = CartState::new();
    let session = RegisterSession::new(&db, &cart, &config, 10);

    let output = play(
        &session,
        "scan 1001\nemail ana@correo.co\nconsent si\ncheckout\nquit\n",
    )
    .await;

    assert!(!output.contains("Error:"));
    assert!(output.contains("Tratamiento de datos: autorizado"));
    assert!(output.contains("¡Gracias por su compra!"));
    assert!(output.contains("$1.785"));
    assert!(output.contains("mailto:ana@correo.co?subject=Factura%20de%20compra"));

    let sales = db.inner().sales().list().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].client_email.as_deref(), Some("ana@correo.co"));
    assert_eq!(sales[0].total_cents.pesos(), 1785);
    assert!(cart.with_cart(|c| c.client_email().is_none() && !c.has_consent()));
}

#[tokio::test]
async fn scanning_past_stock_is_rejected() {
    let (db, config) = setup(0.0).await;
    db.inner()
        .products()
        .update(
            "3",
            frutipos_core::ProductDraft {
                barcode: "1003".into(),
                name: "Papaya".into(),
                category: "Frutas".into(),
                price: "4500".into(),
                cost: "2500".into(),
                stock: "1".into(),
            },
        )
        .await
        .unwrap();

    let cart = CartState::new();
    let session = RegisterSession::new(&db, &cart, &config, 10);
    let mut out = Vec::new();

    session.execute("scan 1003", &mut out).await.unwrap();
    let err = session.execute("scan 1003", &mut out).await.unwrap_err();

    assert_eq!(err.code, frutipos_cli::ErrorCode::InsufficientStock);
    assert_eq!(cart.with_cart(|c| c.items()[0].quantity), 1);
}
