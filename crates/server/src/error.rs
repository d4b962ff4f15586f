//! HTTP error type.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with the
//! status from [`ApiError::status`].

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use map_core::GridError;
use map_store::StoreError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or missing required field.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored grid data is inconsistent with the grid model.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ApiError {
    pub fn map_not_found() -> Self {
        ApiError::NotFound("Map not found".to_owned())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Grid(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Store(StoreError::DuplicateName(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a static string identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Store(err) => err.error_code(),
            ApiError::Grid(err) => err.error_code(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "Request failed: {}", self);
        } else {
            tracing::warn!(code = self.error_code(), "Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_core::Position;

    #[test]
    fn statuses_follow_error_taxonomy() {
        assert_eq!(ApiError::map_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::DuplicateName("m1".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let out_of_bounds = GridError::OutOfBounds {
            position: Position::new(9, 9),
            width: 2,
            height: 2,
        };
        assert_eq!(ApiError::from(out_of_bounds).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_codes_delegate_to_source() {
        assert_eq!(
            ApiError::from(StoreError::LockPoisoned).error_code(),
            "STORE_LOCK_POISONED"
        );
        assert_eq!(ApiError::InvalidInput("x".into()).error_code(), "INVALID_INPUT");
    }
}
