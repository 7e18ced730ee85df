//! Error types for the document Q&A server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Server errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad address) - fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-correctable request error (bad upload extension, malformed body)
    #[error("{0}")]
    Validation(String),

    /// Unknown document
    #[error("Document '{0}' not found")]
    NotFound(String),

    /// Document unreadable, missing or empty during chain construction
    #[error("Document error: {0}")]
    Document(String),

    /// Upstream signaled the caller is issuing requests too quickly
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Rate-limit retries exhausted
    #[error("Service temporarily unavailable due to rate limiting")]
    UpstreamUnavailable,

    /// LLM or embedding API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this failure signals upstream rate limiting.
    ///
    /// Prefers the structured `RateLimited` kind; falls back to a
    /// case-insensitive substring match so unstructured upstream text
    /// (e.g. a raw "Rate limit exceeded" body) is still recognized.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            other => other.to_string().to_lowercase().contains("rate limit"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            Error::NotFound(name) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Document '{}' not found", name),
            ),
            Error::Document(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "document_error", msg.clone())
            }
            Error::RateLimited(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", msg.clone())
            }
            Error::UpstreamUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                self.to_string(),
            ),
            Error::Llm(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "llm_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_rate_limit_detected() {
        let err = Error::RateLimited("requests capped at 1/s".to_string());
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_substring_fallback_is_case_insensitive() {
        let err = Error::Llm("HTTP 429 - RATE LIMIT exceeded, slow down".to_string());
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_other_errors_are_not_rate_limits() {
        let err = Error::Llm("connection refused".to_string());
        assert!(!err.is_rate_limit());
        assert!(!Error::Internal("boom".to_string()).is_rate_limit());
    }
}
