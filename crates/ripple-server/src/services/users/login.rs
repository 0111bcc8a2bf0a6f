use ripple_api_types::Sensitive;
use ripple_error::{ApiError, ErrorCategory, LoginUserFailed};
use ripple_model::user::UserView;
use ripple_model::User;

use crate::auth::jwt::LoginClaims;
use crate::auth::password;
use crate::App;

#[derive(Debug)]
pub struct Login<'a> {
    pub name_or_email: Sensitive<&'a str>,
    pub password: Sensitive<&'a str>,
}

#[derive(Debug)]
pub struct LoginResponse {
    pub user: UserView,
    pub token: String,
}

impl Login<'_> {
    #[tracing::instrument(skip(app), name = "services.users.login")]
    pub async fn perform(self, app: &App) -> Result<LoginResponse, ApiError> {
        let mut conn = app.db_read().await?;

        // Failures must look the same whether the account exists or
        // the password was wrong.
        let invalid_credentials = || {
            ApiError::new(ErrorCategory::LoginUserFailed(
                LoginUserFailed::InvalidCredentials,
            ))
        };

        let Some(user) = User::find_by_login(&mut conn, &self.name_or_email).await? else {
            return Err(invalid_credentials());
        };

        let is_matched =
            password::verify_async(self.password.to_string(), user.password_hash.clone()).await?;

        if !is_matched {
            return Err(invalid_credentials());
        }

        let Some(view) = UserView::find(&mut conn, user.id).await? else {
            return Err(invalid_credentials());
        };

        let token =
            LoginClaims::generate(&view.user, app.config.auth.token_expiry_hours).encode(app)?;

        Ok(LoginResponse { user: view, token })
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_login_with_name() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::register()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = Login {
                name_or_email: Sensitive::new("alice"),
                password: Sensitive::new(&alice.password),
            };

            let response = request.perform(&app).await.unwrap();
            assert_eq!(response.user.user.id, alice.user.id);
            assert!(!response.token.is_empty());
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_login_with_email() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::register()
                .app(&app)
                .name("alice")
                .email("alice@example.com")
                .call()
                .await;

            let request = Login {
                name_or_email: Sensitive::new("alice@example.com"),
                password: Sensitive::new(&alice.password),
            };

            let response = request.perform(&app).await.unwrap();
            assert_eq!(response.user.user.id, alice.user.id);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_wrong_password() {
        test_utils::with_test_app(|app| async move {
            let _ = test_utils::users::register()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = Login {
                name_or_email: Sensitive::new("alice"),
                password: Sensitive::new("not-the-password-1"),
            };

            let error = request.perform(&app).await.expect_error_json();
            assert_json_include!(
                actual: error,
                expected: json!({
                    "code": "login_user_failed",
                    "subcode": "invalid_credentials",
                }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_unknown_users_with_same_shape() {
        test_utils::with_test_app(|app| async move {
            let request = Login {
                name_or_email: Sensitive::new("nobody"),
                password: Sensitive::new("sikret-password-1"),
            };

            let error = request.perform(&app).await.expect_error_json();
            assert_json_include!(
                actual: error,
                expected: json!({
                    "code": "login_user_failed",
                    "subcode": "invalid_credentials",
                }),
            );
        })
        .await;
    }
}
