use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use error_stack::ResultExt;
use ripple_db::Connection;
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::id::UserId;
use ripple_model::User;
use std::ops::Deref;
use thiserror::Error;

use crate::App;

/// The user resolved from the `Authorization: Bearer` token of the
/// current request, placed into the request extensions by the auth
/// middleware.
#[derive(Clone)]
pub struct SessionUser {
    pub user: User,
}

impl SessionUser {
    #[must_use]
    pub fn into_inner(self) -> User {
        self.user
    }
}

impl Deref for SessionUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[derive(Debug, Error)]
#[error("could not make a session user")]
pub(crate) struct GetSessionUserError;

impl SessionUser {
    pub(crate) async fn from_db(
        conn: &mut Connection,
        id: UserId,
    ) -> Result<Self, ApiError> {
        let user = User::find(conn, id)
            .await
            .change_context(GetSessionUserError)?;

        if let Some(user) = user {
            Ok(Self { user })
        } else {
            // the token was signed for a user that no longer exists
            Err(ApiError::new(ErrorCategory::AccessDenied))
        }
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // for diagnostic purposes
        f.debug_struct("SessionUser")
            .field("id", &self.user.id)
            .finish_non_exhaustive()
    }
}

#[axum::async_trait]
impl FromRequestParts<App> for SessionUser {
    type Rejection = Response;

    #[tracing::instrument(skip_all, name = "extractors.session_user")]
    async fn from_request_parts(parts: &mut Parts, _app: &App) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionUser>() {
            Some(identity) => Ok(identity.clone()),
            None => Err(ApiError::new(ErrorCategory::AccessDenied).into_response()),
        }
    }
}
