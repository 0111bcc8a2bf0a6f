use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use ripple_error::ApiError;
use ripple_model::id::UserId;

use crate::auth::jwt::LoginClaims;
use crate::extract::SessionUser;
use crate::App;

#[doc(hidden)]
#[derive(FromRequestParts)]
pub struct Metadata {
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
}

/// Resolves the bearer token, if any, into a [`SessionUser`] request
/// extension. Requests without a token pass through untouched so that
/// public routes keep working.
#[tracing::instrument(skip_all, name = "middleware.auth")]
pub async fn catch_token(
    metadata: Metadata,
    app: State<App>,
    request: Request,
    next: Next,
) -> Response {
    let request = if let Some(header) = metadata.auth_header {
        match process_user_token(&app, request, header.token()).await {
            Ok(request) => request,
            Err(error) => return error.into_response(),
        }
    } else {
        request
    };
    next.run(request).await
}

async fn process_user_token(
    app: &App,
    mut request: Request,
    token: &str,
) -> Result<Request, ApiError> {
    let claims = LoginClaims::decode(app, token)?;

    let mut conn = app.db_read().await?;
    let user = SessionUser::from_db(&mut conn, UserId(claims.sub)).await?;
    drop(conn);

    request.extensions_mut().insert(user);
    Ok(request)
}
