//! Error types for the FAQ RAG backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document could not be read or its text could not be extracted
    #[error("Failed to load '{path}': {message}")]
    Load { path: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Upload cap reached
    #[error("File upload limit reached. Maximum {0} files allowed.")]
    LimitExceeded(usize),

    /// Document not found in the document store
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Vector deletion failed while removing a document
    #[error("Failed to delete vectors for '{filename}': {message}")]
    Deletion { filename: String, message: String },

    /// Embedding provider failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Completion provider failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector index failure
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// A collection or index that was asked to be created already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Rejected request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a load error for the given path
    pub fn load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector index error
    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::LimitExceeded(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::LimitExceeded(20).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::NotFound("a.txt".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::load("a.bin", "bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Deletion {
                filename: "a.txt".into(),
                message: "down".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_limit_message() {
        let msg = Error::LimitExceeded(20).to_string();
        assert_eq!(msg, "File upload limit reached. Maximum 20 files allowed.");
    }
}
