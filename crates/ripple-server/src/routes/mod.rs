use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use ripple_error::{ApiError, ErrorCategory};

use crate::{middleware, App};

mod comments;
mod morphers;
mod posts;
mod users;

/// Builds an [axum router] with every route of the Ripple API plus the
/// shared middleware stack.
///
/// [axum router]: axum::Router
pub fn build_axum_router(app: App) -> Router {
    let router = Router::new()
        .route("/register", post(self::users::register))
        .route("/login", post(self::users::login))
        .route("/users/@me", get(self::users::local_profile))
        .route(
            "/users/:id",
            get(self::users::get_profile).patch(self::users::update_profile),
        )
        .route("/users/:id/follow", post(self::users::follow))
        .route("/users/:id/unfollow", post(self::users::unfollow))
        .route("/users/:id/following", get(self::users::list_following))
        .route("/users/:id/followers", get(self::users::list_followers))
        .route(
            "/posts",
            get(self::posts::list_latest).post(self::posts::publish),
        )
        .route("/posts/feed", get(self::posts::feed))
        .route(
            "/posts/:id",
            get(self::posts::get).patch(self::posts::edit).delete(self::posts::delete),
        )
        .route("/posts/:id/like", post(self::posts::like))
        .route("/posts/:id/unlike", post(self::posts::unlike))
        .route(
            "/comments",
            get(self::comments::list).post(self::comments::create),
        )
        .route("/comments/:id", delete(self::comments::delete))
        .layer(axum::middleware::from_fn_with_state(
            app.clone(),
            middleware::auth::catch_token,
        ))
        .with_state(app)
        .method_not_allowed_fallback(method_not_allowed_route)
        .fallback(not_found_route);

    middleware::apply(router)
}

async fn method_not_allowed_route() -> Response {
    ApiError::new(ErrorCategory::InvalidRequest).into_response()
}

async fn not_found_route(method: Method) -> Response {
    match method {
        Method::HEAD => StatusCode::NOT_FOUND.into_response(),
        _ => ApiError::new(ErrorCategory::NotFound).into_response(),
    }
}
