//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

// Errors

/// Error taxonomy for the API boundary. Upstream LLM failures never
/// appear here; the pipeline absorbs them with per-stage fallbacks.
pub enum ApiError {
    /// Unknown email or thread identifier
    NotFound(String),
    /// Malformed request payload
    Validation(String),
    /// Anything unexpected; logged and surfaced as a 500
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(err) => {
                // Always log the error
                tracing::error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Something went wrong: {}", err),
                )
                    .into_response()
            }
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

// Re-export public types from each route

pub mod emails {
    pub use crate::api::routes::emails::public::*;
}

pub mod pipeline {
    pub use crate::api::routes::pipeline::public::*;
}

pub mod stats {
    pub use crate::api::routes::stats::public::*;
}

pub mod threads {
    pub use crate::api::routes::threads::public::*;
}
