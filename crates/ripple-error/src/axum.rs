use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::{ApiError, ErrorCategory};

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self.category {
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::AccessDenied => StatusCode::UNAUTHORIZED,
            ErrorCategory::ExpiredToken => StatusCode::FORBIDDEN,
            ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Outage => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::LoginUserFailed(..) => StatusCode::UNAUTHORIZED,
            ErrorCategory::RegisterUserFailed(..) => StatusCode::BAD_REQUEST,
        };
        (status_code, Json(self)).into_response()
    }
}
