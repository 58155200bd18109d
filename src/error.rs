//! Error types for the cache and its HTTP host
//!
//! `MediumError` stays inside the durable tiers: they log it and degrade to a
//! miss or a dropped write. `CacheError` is what the HTTP layer reports.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Medium Error Enum ==
/// Failure reported by a storage medium.
#[derive(Error, Debug)]
pub enum MediumError {
    /// The write would exceed the medium's capacity
    #[error("Quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// The medium cannot be used at all (disabled, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Error type for the HTTP host.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in the requested tier
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP host.
pub type Result<T> = std::result::Result<T, CacheError>;
