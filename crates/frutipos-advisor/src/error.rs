//! # Advisor Errors
//!
//! Failures talking to the provider. They are logged and replaced by a
//! fallback message; none reaches the operator as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Transport failure (DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("{provider} returned {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response from {provider}: {message}")]
    Parse { provider: String, message: String },
}

impl From<reqwest::Error> for AdvisorError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest messages may include the full URL; drop the query string
        let msg = e.to_string();
        let sanitized = match msg.find('?') {
            Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
            None => msg,
        };
        AdvisorError::Network(sanitized)
    }
}
