//! # frutipos-advisor: Business Advisory Client
//!
//! Asks a text-generation service for a few tips based on the store's
//! aggregate figures.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales, expenses, products                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BusinessSnapshot::from_history   (snapshot.rs)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Advisor::analyze                 (advisor.rs)                         │
//! │       │                                                                 │
//! │       ├── no provider ──────────► "API Key no configurada..."          │
//! │       ▼                                                                 │
//! │  dyn AdvisoryProvider::generate   (provider.rs, gemini.rs)             │
//! │       │                                                                 │
//! │       ├── error ────────────────► "Ocurrió un error..."                │
//! │       ├── empty ────────────────► "No se pudo generar el análisis."    │
//! │       ▼                                                                 │
//! │  AdvisoryReport (markup kept, plain_text() for the terminal)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Advisor::analyze` never fails. Every failure becomes a fallback message.

pub mod advisor;
pub mod error;
pub mod gemini;
pub mod provider;
pub mod snapshot;

pub use advisor::{Advisor, AdvisoryOutcome, AdvisoryReport};
pub use error::AdvisorError;
pub use gemini::GeminiProvider;
pub use provider::AdvisoryProvider;
pub use snapshot::BusinessSnapshot;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
