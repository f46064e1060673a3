//! # FrutiPOS Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FrutiPOS (terminal)                              │
//! │                                                                         │
//! │  main.rs ────► logging, argument parsing, exit status                   │
//! │                                                                         │
//! │  lib.rs ─────► settings, database, state, dispatch                      │
//! │                                                                         │
//! │  commands/ ──► product, register, sale, expense, report, config         │
//! │                                                                         │
//! │  state/ ─────► DbState, CartState, StoreConfigState                     │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                 frutipos.db (local SQLite file, WAL mode)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::process::ExitCode;

use frutipos_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    frutipos_cli::init_tracing();

    let cli = Cli::parse();

    match frutipos_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
