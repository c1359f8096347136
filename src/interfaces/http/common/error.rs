//! Domain error to HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::ApiResponse;
use crate::domain::DomainError;

/// Handler result carrying the standard envelope
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Error returned by handlers.
///
/// | DomainError  | Status |
/// |--------------|--------|
/// | `NotFound`   | 404    |
/// | `Validation` | 400    |
/// | `Storage`    | 500    |
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}
