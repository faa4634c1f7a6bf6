//! Error types for the answer bot

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bot errors, one variant per pipeline stage
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing, unreadable or malformed service-account credentials
    #[error("Credential error: {0}")]
    Credential(String),

    /// Document source transport or auth failure
    #[error("Document source unavailable: {0}")]
    SourceUnavailable(String),

    /// Nothing indexable was produced from the fetched documents
    #[error("No chunks to index: the corpus is empty")]
    EmptyCorpus,

    /// Embedding model unreachable or rejected the input
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generation model invocation failed
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Webhook signature missing or does not match the body
    #[error("Invalid webhook signature: {0}")]
    SignatureValidation(String),

    /// Reply delivery to the messaging platform failed
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Create a source unavailable error
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short machine-readable kind, used in logs and error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Credential(_) => "credential_error",
            Error::SourceUnavailable(_) => "source_unavailable",
            Error::EmptyCorpus => "empty_corpus",
            Error::Embedding(_) => "embedding_error",
            Error::Generation(_) => "generation_error",
            Error::SignatureValidation(_) => "invalid_signature",
            Error::Messaging(_) => "messaging_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::SignatureValidation(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Credential(_) | Error::EmptyCorpus => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::SourceUnavailable(_) | Error::Http(_) | Error::Messaging(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Embedding(_) | Error::Generation(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
