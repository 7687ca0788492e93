//! HTTP error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors a route can fail with
///
/// Expected business outcomes are never errors; they are rendered as
/// ordinary replies by the route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Database(String),

    #[error("could not fetch price for {0}")]
    Quote(String),
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        ApiError::Database(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Database(message) => {
                tracing::error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            ApiError::Quote(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
        }
    }
}
