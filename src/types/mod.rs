//! Request and response types for the HTTP surface

use serde::{Deserialize, Serialize};

/// POST /ask request body (the frontend sends `{"input": "..."}`)
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// The natural-language question
    pub input: String,
}

/// POST /ask response body
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    /// The synthesized answer
    pub answer: String,
}

/// A document in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Filename within the document store
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Whether this document currently backs the pipeline
    pub active: bool,
}

/// Generic status payload for health, activation and reset responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// "ok", "success" or "warning"
    pub status: String,
    /// Human-readable detail
    pub message: String,
}

impl StatusResponse {
    /// Build an "ok" status
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    /// Build a "success" status
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    /// Build a "warning" status
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: "warning".to_string(),
            message: message.into(),
        }
    }
}
