//! # Advisor
//!
//! Wraps a provider and turns every outcome, including failures, into a
//! displayable report.

use std::time::Duration;
use tracing::{error, info, warn};

use crate::gemini::GeminiProvider;
use crate::provider::AdvisoryProvider;
use crate::snapshot::BusinessSnapshot;

/// Shown when no API key is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "API Key no configurada. No se puede generar el análisis.";

/// Shown when the provider call fails.
pub const FAILURE_MESSAGE: &str = "Ocurrió un error al consultar al asesor inteligente.";

/// Shown when the provider answers with nothing.
pub const EMPTY_MESSAGE: &str = "No se pudo generar el análisis.";

/// How the report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryOutcome {
    /// Text generated by the provider.
    Advice,
    NotConfigured,
    Failed,
    Empty,
}

/// Result of an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryReport {
    pub outcome: AdvisoryOutcome,
    /// Provider text (simple HTML) or a fallback message.
    pub text: String,
}

impl AdvisoryReport {
    fn fallback(outcome: AdvisoryOutcome, message: &str) -> Self {
        AdvisoryReport {
            outcome,
            text: message.to_string(),
        }
    }

    pub fn is_advice(&self) -> bool {
        self.outcome == AdvisoryOutcome::Advice
    }

    /// The text with markup removed, for terminal display. Provider output
    /// is never rendered as markup.
    pub fn plain_text(&self) -> String {
        strip_markup(&self.text)
    }
}

/// Entry point for business analysis.
pub struct Advisor {
    provider: Option<Box<dyn AdvisoryProvider>>,
}

impl Advisor {
    pub fn new(provider: impl AdvisoryProvider + 'static) -> Self {
        Advisor {
            provider: Some(Box::new(provider)),
        }
    }

    /// An advisor without credentials. Every analysis returns the
    /// not-configured message.
    pub fn unconfigured() -> Self {
        Advisor { provider: None }
    }

    /// Gemini-backed advisor, or an unconfigured one when `api_key` is
    /// missing or blank.
    pub fn gemini(api_key: Option<&str>, model: &str, timeout: Duration) -> Self {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Self::new(GeminiProvider::with_options(key, model, timeout)),
            None => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Asks the provider for advice. Never fails; see the fallback messages.
    pub async fn analyze(&self, snapshot: &BusinessSnapshot) -> AdvisoryReport {
        let Some(provider) = &self.provider else {
            warn!("Advisory analysis requested without an API key");
            return AdvisoryReport::fallback(AdvisoryOutcome::NotConfigured, NOT_CONFIGURED_MESSAGE);
        };

        let prompt = snapshot.build_prompt();
        match provider.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(provider = provider.name(), "Provider returned no text");
                AdvisoryReport::fallback(AdvisoryOutcome::Empty, EMPTY_MESSAGE)
            }
            Ok(text) => {
                info!(provider = provider.name(), chars = text.len(), "Analysis received");
                AdvisoryReport {
                    outcome: AdvisoryOutcome::Advice,
                    text,
                }
            }
            Err(e) => {
                error!(provider = provider.name(), error = %e, "Advisory call failed");
                AdvisoryReport::fallback(AdvisoryOutcome::Failed, FAILURE_MESSAGE)
            }
        }
    }
}

// =============================================================================
// Markup Stripping
// =============================================================================

/// Drops tags, turns block ends into line breaks and list items into
/// bullets, and decodes the common entities.
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            // Unterminated tag, keep it as text
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let tag = rest[start + 1..start + end].trim().to_lowercase();
        let name = tag.trim_start_matches('/').split_whitespace().next().unwrap_or("");
        match name {
            "li" if !tag.starts_with('/') => out.push_str("\n- "),
            "p" | "ul" | "ol" | "br" | "br/" | "div" | "h1" | "h2" | "h3" => out.push('\n'),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<&str> = decoded
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines.join("\n")
}
