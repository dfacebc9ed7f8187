//! Error types for the contract RAG system

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Contract RAG errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request is missing a required field or carries an invalid one
    #[error("{0}")]
    Validation(String),

    /// Text extraction failed for a malformed document
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Chunk storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Similarity search backend unavailable or misconfigured
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Conflict reasoning backend failed or returned a malformed response
    #[error("Conflict reasoning failed: {0}")]
    Reasoning(String),

    /// Summarization backend failed
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// Ollama/LLM transport error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Retrieval failed while scanning a specific chunk (1-based)
    #[error("Error retrieving context for chunk {chunk_index}: {source}")]
    ChunkRetrieval {
        chunk_index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Reasoning failed while scanning a specific chunk (1-based)
    #[error("Error processing chunk {chunk_index}: {source}")]
    ChunkReasoning {
        chunk_index: usize,
        #[source]
        source: Box<Error>,
    },

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

    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The 1-based index of the chunk a scan failed on, if any
    pub fn failed_chunk(&self) -> Option<usize> {
        match self {
            Error::ChunkRetrieval { chunk_index, .. } | Error::ChunkReasoning { chunk_index, .. } => {
                Some(*chunk_index)
            }
            _ => None,
        }
    }

    /// Whether the caller caused this error (bad input) rather than a backend
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::Extraction { .. }
                | Error::UnsupportedFileType(_)
                | Error::Json(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
