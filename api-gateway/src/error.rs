//! Mapping from relay failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_shared::{ErrorBody, RelayError};
use tracing::error;

pub const USER_FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching users.";

/// Handler error. Wraps [`RelayError`] so handlers can use `?`.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl ApiError {
    /// Replace anything but an upstream status with a 500 carrying `message`.
    pub fn masked(error: RelayError, message: &str) -> Self {
        match error {
            RelayError::Upstream { .. } => Self(error),
            other => {
                error!("{}: {}", message, other);
                Self(RelayError::Transport(message.to_string()))
            }
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(value: RelayError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            RelayError::Upstream { status, error } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(error)).into_response()
            }
            RelayError::NotFound(message) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(message))).into_response(),
            RelayError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            RelayError::UpstreamFetch(message) => {
                error!("User directory fetch failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(USER_FETCH_ERROR_MESSAGE)),
                )
                    .into_response()
            }
            RelayError::Transport(message) => {
                error!("Upstream request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
            }
            other => {
                error!("Internal error: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(other.to_string()))).into_response()
            }
        }
    }
}
