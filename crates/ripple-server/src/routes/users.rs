use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ripple_api_types::pagination::Pagination;
use ripple_api_types::routes::users::{
    FollowUserResponse, ListFollowsResponse, LoginUser, LoginUserResponse, RegisterUser,
    RegisterUserResponse, UnfollowUserResponse, UpdateUserProfile,
};
use ripple_api_types::Sensitive;
use ripple_error::ApiError;
use ripple_model::id::UserId;

use super::morphers::{IntoApiUserSummary, IntoApiUserView};
use crate::extract::{Json, SessionUser};
use crate::{services, App};

pub async fn register(app: App, Json(form): Json<RegisterUser>) -> Result<Response, ApiError> {
    let request = services::users::Register {
        name: Sensitive::new(form.name.as_str()),
        email: form.email.as_ref().map(|v| Sensitive::new(v.as_str())),
        password: Sensitive::new(form.password.as_str()),
    };

    let response = request.perform(&app).await?;
    let response = (
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            user: response.user.into_api_local_user_view(),
            token: response.token,
        }),
    );

    Ok(response.into_response())
}

pub async fn login(app: App, Json(form): Json<LoginUser>) -> Result<Response, ApiError> {
    let request = services::users::Login {
        name_or_email: Sensitive::new(form.name_or_email.as_str()),
        password: Sensitive::new(form.password.as_str()),
    };

    let response = request.perform(&app).await?;
    let response = Json(LoginUserResponse {
        user: response.user.into_api_local_user_view(),
        token: response.token,
    });

    Ok(response.into_response())
}

pub async fn local_profile(app: App, session_user: SessionUser) -> Result<Response, ApiError> {
    let request = services::users::GetUserProfile {
        id: session_user.id,
    };

    let view = request.perform(&app).await?;
    Ok(Json(view.into_api_local_user_view()).into_response())
}

pub async fn get_profile(app: App, Path(id): Path<i64>) -> Result<Response, ApiError> {
    let request = services::users::GetUserProfile { id: UserId(id) };
    let view = request.perform(&app).await?;

    Ok(Json(view.into_api_user_view()).into_response())
}

pub async fn update_profile(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
    Json(form): Json<UpdateUserProfile>,
) -> Result<Response, ApiError> {
    let request = services::users::UpdateUserProfile {
        id: UserId(id),
        display_name: form.display_name.as_deref(),
        bio: form.bio.as_deref(),
        avatar_url: form.avatar_url.as_deref(),
    };

    let view = request.perform(&app, &session_user).await?;
    Ok(Json(view.into_api_local_user_view()).into_response())
}

pub async fn follow(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::users::FollowUser {
        target: Sensitive::new(UserId(id)),
    };

    let result = request.perform(&app, &session_user).await?;
    let response = Json(FollowUserResponse {
        following: true,
        created: result.created,
    });

    Ok(response.into_response())
}

pub async fn unfollow(
    app: App,
    session_user: SessionUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let request = services::users::UnfollowUser {
        target: Sensitive::new(UserId(id)),
    };

    let result = request.perform(&app, &session_user).await?;
    let response = Json(UnfollowUserResponse {
        following: false,
        removed: result.removed,
    });

    Ok(response.into_response())
}

pub async fn list_following(
    app: App,
    Path(id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, ApiError> {
    let request = services::users::ListFollowing {
        id: UserId(id),
        pagination,
    };

    let users = request.perform(&app).await?;
    let response = Json(ListFollowsResponse {
        users: users.into_iter().map(|v| v.into_api_user_summary()).collect(),
    });

    Ok(response.into_response())
}

pub async fn list_followers(
    app: App,
    Path(id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, ApiError> {
    let request = services::users::ListFollowers {
        id: UserId(id),
        pagination,
    };

    let users = request.perform(&app).await?;
    let response = Json(ListFollowsResponse {
        users: users.into_iter().map(|v| v.into_api_user_summary()).collect(),
    });

    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use serde_json::json;

    mod register {
        use super::*;
        use ripple_api_types::routes::users::RegisterUser;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_register_user() {
            test_utils::with_test_server(|_app, server| async move {
                let request = RegisterUser::builder()
                    .name("alice")
                    .email("alice@example.com")
                    .password("sikret-password-1")
                    .build();

                let response = server.post("/register").json(&request).await;
                response.assert_status(axum::http::StatusCode::CREATED);
                response.assert_json_contains(&json!({
                    "user": {
                        "name": "alice",
                        "followers": 0,
                        "following": 0,
                        "posts": 0,
                    },
                }));
            })
            .await;
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_reject_malformed_bodies() {
            test_utils::with_test_server(|_app, server| async move {
                let response = server.post("/register").json(&json!({ "name": 42 })).await;
                response.assert_status_bad_request();
                response.assert_json_contains(&json!({ "code": "invalid_request" }));
            })
            .await;
        }
    }

    mod login {
        use super::*;
        use ripple_api_types::routes::users::LoginUser;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_login_user() {
            test_utils::with_test_server(|app, server| async move {
                let alice = test_utils::users::register()
                    .app(&app)
                    .name("alice")
                    .call()
                    .await;

                let request = LoginUser::builder()
                    .name_or_email("alice")
                    .password(alice.password.as_str())
                    .build();

                let response = server.post("/login").json(&request).await;
                response.assert_status_ok();
                response.assert_json_contains(&json!({
                    "user": { "name": "alice" },
                }));
            })
            .await;
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_reject_bad_credentials() {
            test_utils::with_test_server(|app, server| async move {
                let _ = test_utils::users::register()
                    .app(&app)
                    .name("alice")
                    .call()
                    .await;

                let request = LoginUser::builder()
                    .name_or_email("alice")
                    .password("not-the-password-1")
                    .build();

                let response = server.post("/login").json(&request).await;
                response.assert_status_unauthorized();
                response.assert_json_contains(&json!({
                    "code": "login_user_failed",
                    "subcode": "invalid_credentials",
                }));
            })
            .await;
        }
    }

    mod local_profile {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_get_their_profile() {
            test_utils::with_test_server(|app, mut server| async move {
                let alice = test_utils::users::override_credentials()
                    .app(&app)
                    .server(&mut server)
                    .name("alice")
                    .call()
                    .await;

                let response = server.get("/users/@me").await;
                response.assert_status_ok();
                response.assert_json_contains(&json!({
                    "id": alice.user.id.0,
                    "name": alice.user.name,

                    "followers": 0,
                    "following": 0,
                    "posts": 0,
                }));
            })
            .await;
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_show_email_to_the_owner_only() {
            test_utils::with_test_server(|app, mut server| async move {
                let alice = test_utils::users::override_credentials()
                    .app(&app)
                    .server(&mut server)
                    .name("alice")
                    .email("alice@example.com")
                    .call()
                    .await;

                let response = server.get("/users/@me").await;
                response.assert_status_ok();
                response.assert_json_contains(&json!({
                    "email": "alice@example.com",
                }));

                let response = server.get(&format!("/users/{}", alice.user.id.0)).await;
                response.assert_status_ok();

                let body = response.json::<serde_json::Value>();
                assert!(body.get("email").is_none());
            })
            .await;
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_restrict_if_no_auth_is_presented() {
            test_utils::with_test_server(|_app, server| async move {
                let response = server.get("/users/@me").await;
                response.assert_status_unauthorized();
                response.assert_json_contains(&json!({ "code": "access_denied" }));
            })
            .await;
        }
    }

    mod follow {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_follow_and_unfollow() {
            test_utils::with_test_server(|app, mut server| async move {
                let _alice = test_utils::users::override_credentials()
                    .app(&app)
                    .server(&mut server)
                    .name("alice")
                    .call()
                    .await;

                let bob = test_utils::users::register()
                    .app(&app)
                    .name("bob")
                    .call()
                    .await;

                let response = server.post(&format!("/users/{}/follow", bob.user.id.0)).await;
                response.assert_status_ok();
                response.assert_json_contains(&json!({
                    "following": true,
                    "created": true,
                }));

                let response = server
                    .post(&format!("/users/{}/unfollow", bob.user.id.0))
                    .await;
                response.assert_status_ok();
                response.assert_json_contains(&json!({
                    "following": false,
                    "removed": true,
                }));
            })
            .await;
        }
    }
}
