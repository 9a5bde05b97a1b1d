//! Text generation provider abstraction.
//!
//! The relay talks to its upstream through [`TextProvider`] so the HTTP
//! layer never depends on a concrete API client.

pub mod gemini;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::Secret;
use thiserror::Error;

/// Error type for provider operations.
///
/// Messages never include the API key: reqwest errors are stored with their
/// URL stripped because the key travels as a query parameter.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream request failed with status {status}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProviderError::Timeout;
        }

        let err = err.without_url();
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if err.is_builder() {
            ProviderError::Client(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Trait for single-shot text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text completion for `prompt`.
    ///
    /// Returns an empty string when the upstream succeeds but carries no
    /// text.
    async fn generate(&self, api_key: &Secret<String>, prompt: &str)
        -> Result<String, ProviderError>;
}
