//! Error types for SupportChat
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// Every variant maps to a status code and a JSON body of the form
/// `{ "error": message }`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Validation error (400)
    #[error("{0}")]
    Validation(String),

    /// Signed session cookie failed verification (401)
    #[error("Invalid signature")]
    InvalidSignature,

    /// Identity provider refused the authorization code (401)
    #[error("Identity provider rejected the authorization code: {0}")]
    ProviderRejected(String),

    /// Identity provider failed or answered with garbage (502)
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encryption/signing error (500)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("invalid URL: {err}"))
    }
}

impl AppError {
    /// Status code, client-facing message and metric label for this error.
    ///
    /// Provider, config and internal details stay in the logs.
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), "unauthorized"),
            AppError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                self.to_string(),
                "invalid_signature",
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::ProviderRejected(_) => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired authorization code".to_string(),
                "provider_rejected",
            ),
            AppError::ProviderUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "Identity provider unavailable".to_string(),
                "provider_unavailable",
            ),
            AppError::HttpClient(_) => (
                StatusCode::BAD_GATEWAY,
                "Identity provider unavailable".to_string(),
                "http_client",
            ),
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                "config",
            ),
            AppError::Encryption(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "encryption",
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "internal",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message, error_type) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, error_type, "Request failed");
        } else {
            tracing::debug!(error = %self, error_type, "Request rejected");
        }

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
