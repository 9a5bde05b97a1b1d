use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures of the generate endpoint.
///
/// The `Display` text of client and configuration errors is the message
/// returned to the caller. Upstream errors are logged and collapsed into a
/// generic message.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Only POST requests are allowed")]
    MethodNotAllowed,

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Prompt must be a string")]
    InvalidPrompt,

    #[error("Upstream error: {0}")]
    Upstream(#[from] ProviderError),
}

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MissingPrompt | RelayError::InvalidPrompt => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed => "method_not_allowed",
            RelayError::MissingApiKey => "missing_api_key",
            RelayError::MissingPrompt => "missing_prompt",
            RelayError::InvalidPrompt => "invalid_prompt",
            RelayError::Upstream(_) => "upstream_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            RelayError::Upstream(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        match &self {
            RelayError::Upstream(err) => {
                tracing::error!(error = %err, "Error in generate handler");
            }
            RelayError::MissingApiKey => {
                tracing::error!("Generate request rejected: API key not configured");
            }
            _ => {}
        }

        (
            self.status(),
            Json(ErrorResponse {
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}
