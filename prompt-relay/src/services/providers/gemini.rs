//! Gemini AI provider implementation.
//!
//! Sends a single-turn `generateContent` request and returns the text of the
//! first candidate.

use super::{ProviderError, TextProvider};
use crate::config::UpstreamConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: UpstreamConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: UpstreamConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Build the `generateContent` URL for the configured model.
    ///
    /// The API key is attached separately as a query parameter.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        api_key: &Secret<String>,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", api_key.expose_secret())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(ProviderError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let api_response: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(api_response.into_text())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Every level is optional: a missing or `null` field or array element
/// anywhere along `candidates[0].content.parts[0].text` yields an empty
/// string.
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Option<Candidate>>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<Option<ResponsePart>>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> String {
        self.candidates
            .and_then(|candidates| candidates.into_iter().next().flatten())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .and_then(|parts| parts.into_iter().next().flatten())
            .and_then(|part| part.text)
            .unwrap_or_default()
    }
}
