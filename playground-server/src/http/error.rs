//! Mapping of broker errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use face_overlay::RenderError;
use playground_core::PlaygroundError;
use tracing::error;

/// Error returned by every handler.
///
/// Unknown codes, areas, assets and response types are 404 with the error text; malformed
/// input is 400; anything else is logged and answered with an empty 500.
#[derive(Debug)]
pub struct ApiError(pub PlaygroundError);

impl From<PlaygroundError> for ApiError {
    fn from(e: PlaygroundError) -> Self {
        Self(e)
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_not_found() {
            return (StatusCode::NOT_FOUND, err.to_string()).into_response();
        }
        if let PlaygroundError::InvalidRequest(_) = err {
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
        error!(error = %err, "Request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
