//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache engines, backends and the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Substrate could not be opened or attached at construction
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Lock primitive failed to acquire or release
    #[error("Engine failure: {0}")]
    EngineFatal(String),

    /// Key not found (HTTP layer only, engines resolve it to the default)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored envelope could not be decoded
    #[error("Corrupt entry: {0}")]
    CorruptEntry(String),

    /// The get_set producer failed
    #[error("Producer failed: {0}")]
    Producer(#[source] anyhow::Error),

    /// Value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Arena I/O failed during an operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Returns true for errors after which the engine handle must not be reused.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CacheError::Connection(_) | CacheError::EngineFatal(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Connection(_) | CacheError::EngineFatal(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
