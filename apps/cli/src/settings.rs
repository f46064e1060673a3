//! # Application Settings
//!
//! Machine-level settings: where the data lives, how to reach the advisory
//! service and when a product counts as low on stock. The store identity
//! and tax rate are not here; they live in the store itself (`config set`).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./caja.db                                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     FRUTIPOS_DB_PATH=/srv/frutipos.db                                  │
//! │     FRUTIPOS_API_KEY=... (falls back to API_KEY)                       │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config PATH, or frutipos.toml in the platform config dir        │
//! │     ~/.config/frutipos/frutipos.toml (Linux)                           │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # frutipos.toml
//! db_path = "/home/caja/frutipos.db"
//! low_stock_threshold = 10
//!
//! [advisor]
//! api_key = "..."
//! model = "gemini-3-flash-preview"
//! timeout_secs = 30
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use frutipos_advisor::{Advisor, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use frutipos_core::LOW_STOCK_THRESHOLD;

use crate::error::{AppError, AppResult};

/// Settings file name inside the platform config directory.
pub const SETTINGS_FILE: &str = "frutipos.toml";

/// Database file name inside the platform data directory.
pub const DB_FILE: &str = "frutipos.db";

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Products with stock strictly below this are reported as low.
    pub low_stock_threshold: i64,

    pub advisor: AdvisorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: None,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            advisor: AdvisorSettings::default(),
        }
    }
}

/// Advisory service access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    /// Provider credential. Without it every analysis returns the
    /// not-configured message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub model: String,

    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        AdvisorSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Loads settings from all sources.
    ///
    /// An explicit `config_file` must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut settings = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No settings file, using defaults");
                    Settings::default()
                }
            },
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parses a TOML settings file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("No se pudo leer el archivo de ajustes {}: {}", path.display(), e))
        })?;
        let settings = Self::from_toml(&content)?;
        info!(path = %path.display(), "Settings file loaded");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides fields from environment variables read through `var`.
    ///
    /// ## Variables
    /// - `FRUTIPOS_DB_PATH`
    /// - `FRUTIPOS_API_KEY`, then `API_KEY`
    /// - `FRUTIPOS_ADVISOR_MODEL`
    /// - `FRUTIPOS_ADVISOR_TIMEOUT_SECS`
    /// - `FRUTIPOS_LOW_STOCK`
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("FRUTIPOS_DB_PATH").filter(|v| !v.trim().is_empty()) {
            self.db_path = Some(PathBuf::from(path));
        }

        if let Some(key) = var("FRUTIPOS_API_KEY").or_else(|| var("API_KEY")) {
            self.advisor.api_key = Some(key);
        }

        if let Some(model) = var("FRUTIPOS_ADVISOR_MODEL").filter(|v| !v.trim().is_empty()) {
            self.advisor.model = model;
        }

        if let Some(raw) = var("FRUTIPOS_ADVISOR_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.advisor.timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid FRUTIPOS_ADVISOR_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = var("FRUTIPOS_LOW_STOCK") {
            match raw.trim().parse() {
                Ok(threshold) => self.low_stock_threshold = threshold,
                Err(_) => warn!(value = %raw, "Ignoring invalid FRUTIPOS_LOW_STOCK"),
            }
        }
    }

    /// The database file, creating the platform data directory when the
    /// default location is used.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()
            .ok_or_else(|| AppError::config("No se pudo determinar la carpeta de datos"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DB_FILE))
    }

    /// The advisor these settings describe.
    pub fn advisor(&self) -> Advisor {
        Advisor::gemini(
            self.advisor.api_key.as_deref(),
            &self.advisor.model,
            Duration::from_secs(self.advisor.timeout_secs),
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("co", "frutipos", "frutipos")
}

/// `frutipos.toml` in the platform config directory.
///
/// - **Linux**: `~/.config/frutipos/frutipos.toml`
/// - **macOS**: `~/Library/Application Support/co.frutipos.frutipos/frutipos.toml`
/// - **Windows**: `%APPDATA%\frutipos\frutipos\config\frutipos.toml`
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(SETTINGS_FILE))
}
