use axum::{body::Bytes, extract::State, http::Method, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use validator::Validate;

use crate::error::RelayError;
use crate::services::metrics;
use crate::startup::AppState;

/// Inbound body as sent. `prompt` stays untyped until it is classified.
#[derive(Debug, Default, Deserialize)]
struct RawGenerateRequest {
    #[serde(default)]
    prompt: Value,
}

#[derive(Debug, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: String,
}

/// Relay a prompt to the text provider.
///
/// Accepts every method so that non-POST requests get the JSON 405 body.
/// The body is read raw and only parsed after the method and API key checks.
#[tracing::instrument(skip_all, fields(method = %method))]
pub async fn generate(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<GenerateResponse>, RelayError> {
    let result = relay(&state, &method, &body).await;

    match &result {
        Ok(_) => metrics::record_outcome("ok"),
        Err(e) => metrics::record_outcome(e.outcome()),
    }

    result.map(|text| Json(GenerateResponse { text }))
}

async fn relay(state: &AppState, method: &Method, body: &[u8]) -> Result<String, RelayError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let api_key = state.api_key.as_ref().ok_or(RelayError::MissingApiKey)?;
    let prompt = parse_prompt(body)?;

    let started = Instant::now();
    let result = state.text_provider.generate(api_key, &prompt).await;
    metrics::observe_upstream(started.elapsed());

    let text = result?;
    tracing::info!(text_len = text.len(), "Generated text");

    Ok(text)
}

/// Falsy prompts (absent, `null`, `false`, `0`, `""`) and unparseable bodies
/// are a missing prompt. Any other non-string prompt is invalid.
fn parse_prompt(body: &[u8]) -> Result<String, RelayError> {
    let raw: RawGenerateRequest = serde_json::from_slice(body).unwrap_or_default();

    let request = match raw.prompt {
        Value::String(prompt) => GenerateRequest { prompt },
        value if is_falsy(&value) => return Err(RelayError::MissingPrompt),
        _ => return Err(RelayError::InvalidPrompt),
    };

    request.validate().map_err(|_| RelayError::MissingPrompt)?;
    Ok(request.prompt)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_prompt() {
        let prompt = parse_prompt(br#"{"prompt":"Tell me a joke"}"#).unwrap();
        assert_eq!(prompt, "Tell me a joke");
    }

    #[test]
    fn whitespace_prompt_is_forwarded_as_is() {
        assert_eq!(parse_prompt(br#"{"prompt":"  "}"#).unwrap(), "  ");
    }

    #[test]
    fn rejects_missing_or_falsy_prompt() {
        for body in [
            &b"{}"[..],
            br#"{"prompt":null}"#,
            br#"{"prompt":""}"#,
            br#"{"prompt":0}"#,
            br#"{"prompt":0.0}"#,
            br#"{"prompt":false}"#,
            b"",
            b"[]",
            b"not json",
        ] {
            assert!(
                matches!(parse_prompt(body), Err(RelayError::MissingPrompt)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn truthy_non_string_prompt_is_invalid() {
        for body in [
            &br#"{"prompt":42}"#[..],
            br#"{"prompt":true}"#,
            br#"{"prompt":["x"]}"#,
            br#"{"prompt":{}}"#,
        ] {
            assert!(
                matches!(parse_prompt(body), Err(RelayError::InvalidPrompt)),
                "body {:?} should be invalid",
                String::from_utf8_lossy(body)
            );
        }
    }
}
