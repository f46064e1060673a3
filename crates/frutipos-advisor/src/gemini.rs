use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::AdvisorError;
use crate::provider::AdvisoryProvider;
use crate::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";

/// Google Gemini provider, `models/{model}:generateContent` endpoint.
///
/// - **Auth**: API key sent in the `x-goog-api-key` header
/// - **Request**: a single user turn holding the prompt
/// - **Response**: text parts of the first candidate, concatenated
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_options(api_key, DEFAULT_MODEL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the provider at another host, e.g. a proxy.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AdvisoryProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, "Requesting analysis");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Api {
                provider: PROVIDER.into(),
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| AdvisorError::Parse {
            provider: PROVIDER.into(),
            message: e.to_string(),
        })?;

        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::new("key").base_url("http://localhost:8080/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hola" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hola");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "<p>Uno</p>"}, {"text": "<p>Dos</p>"}]}},
                {"content": {"parts": [{"text": "ignorado"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), "<p>Uno</p><p>Dos</p>");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(blocked.text(), "");
    }
}
