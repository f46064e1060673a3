//! # FrutiPOS Command Line
//!
//! The terminal front end: parses the command line, opens the store and
//! hands each subcommand to its handler.
//!
//! ## Module Layout
//! ```text
//! src/
//! ├── main.rs      ◄─── Entry point, exit status
//! ├── lib.rs       ◄─── You are here (startup, dispatch)
//! ├── cli.rs       ◄─── clap definitions
//! ├── settings.rs  ◄─── Defaults → TOML file → environment
//! ├── error.rs     ◄─── AppError and conversions
//! ├── state/       ◄─── DbState, CartState, StoreConfigState
//! └── commands/    ◄─── One handler per subcommand
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;
pub mod state;

pub use cli::Cli;
pub use error::{AppError, AppResult, ErrorCode};
pub use settings::Settings;

use std::io::Write;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Command;
use commands::register::RegisterSession;
use frutipos_db::{Database, DbConfig};
use state::{CartState, DbState, StoreConfigState};

/// Runs one invocation of the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Load Settings ────────────────────────────────────────────────────► │
/// │     • defaults, frutipos.toml, FRUTIPOS_* variables, --db               │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • Linux: ~/.local/share/frutipos/frutipos.db                        │
/// │     • macOS: ~/Library/Application Support/co.frutipos.frutipos/        │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • DbState, StoreConfigState (loaded from the store)                 │
/// │                                                                         │
/// │  5. Dispatch to the command handler                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> AppResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        settings.db_path = Some(db);
    }

    let db_path = settings.database_path()?;
    info!(?db_path, "Database path determined");

    let db = DbState::new(Database::new(DbConfig::new(db_path)).await?);
    let config = StoreConfigState::load(db.inner()).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = dispatch(cli.command, &settings, &db, &config, &mut out).await;
    out.flush()?;

    db.inner().close().await;
    result
}

/// Routes a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    settings: &Settings,
    db: &DbState,
    config: &StoreConfigState,
    out: &mut impl Write,
) -> AppResult<()> {
    match command {
        Command::Product { action } => commands::product::run(db, settings, action, out).await,
        Command::Register => {
            let cart = CartState::new();
            let session = RegisterSession::new(db, &cart, config, settings.low_stock_threshold);
            let input = BufReader::new(tokio::io::stdin());
            commands::register::run(&session, input, out).await
        }
        Command::Sale { action } => commands::sale::run(db, config, action, out).await,
        Command::Expense { action } => commands::expense::run(db, action, out).await,
        Command::Report { action } => {
            let advisor = settings.advisor();
            commands::report::run(db, settings, &advisor, action, out).await
        }
        Command::Config { action } => commands::config::run(db, config, action, out).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout can be piped.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=frutipos_db=trace` - Trace the storage layer only
/// - Default: INFO, DEBUG for frutipos crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,frutipos=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
