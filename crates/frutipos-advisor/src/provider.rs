use async_trait::async_trait;

use crate::error::AdvisorError;

/// A text-generation backend.
///
/// The advisor only needs "prompt in, text out", so swapping vendors means
/// adding one implementation of this trait.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs).
    fn name(&self) -> &str;

    /// Sends `prompt` and returns the generated text, possibly empty.
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError>;
}
