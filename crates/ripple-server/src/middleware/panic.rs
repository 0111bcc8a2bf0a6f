use axum::response::{IntoResponse, Response};
use ripple_error::ApiError;
use std::any::Any;
use tracing::error;

#[tracing::instrument(skip_all, name = "middleware.catch_panic")]
pub fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let data = if let Some(s) = err.downcast_ref::<String>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "<unknown>".into()
    };

    error!("Route handler got panicked: {data}");
    ApiError::unknown()
        .message("Unexpected error has occurred. Please try again later.")
        .into_response()
}
