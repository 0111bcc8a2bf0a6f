use ripple_api_types::Sensitive;
use ripple_db::error::ErrorExt;
use ripple_error::{ApiError, ErrorCategory, RegisterUserFailed};
use ripple_model::user::{InsertUser, Profile, UserView};
use ripple_model::User;

use crate::auth::jwt::LoginClaims;
use crate::auth::password;
use crate::App;

#[derive(Debug)]
pub struct Register<'a> {
    pub name: Sensitive<&'a str>,
    pub email: Option<Sensitive<&'a str>>,
    pub password: Sensitive<&'a str>,
}

#[derive(Debug)]
pub struct RegisterResult {
    pub user: UserView,
    pub token: String,
}

impl Register<'_> {
    #[tracing::instrument(skip(app), name = "services.users.register")]
    pub async fn perform(self, app: &App) -> Result<RegisterResult, ApiError> {
        if !app.validate_username(&self.name) {
            let error = ApiError::new(ErrorCategory::InvalidRequest).message("Invalid username.");
            return Err(error);
        }

        if let Some(email) = self.email.as_deref() {
            if !app.validate_email(email) {
                return Err(ApiError::new(ErrorCategory::InvalidRequest)
                    .message("Invalid email address."));
            }
        }

        if !app.validate_password(&self.password) {
            return Err(ApiError::new(ErrorCategory::RegisterUserFailed(
                RegisterUserFailed::WeakPassword,
            )));
        }

        let mut conn = app.db_write().await?;
        if User::check_username_taken(&mut conn, &self.name).await? {
            return Err(ApiError::new(ErrorCategory::RegisterUserFailed(
                RegisterUserFailed::UsernameTaken,
            )));
        }

        if let Some(email) = self.email.as_deref() {
            if User::check_email_taken(&mut conn, email).await? {
                return Err(ApiError::new(ErrorCategory::RegisterUserFailed(
                    RegisterUserFailed::EmailTaken,
                )));
            }
        }

        let password_hash = password::hash_async(self.password.to_string()).await?;

        let user = InsertUser::builder()
            .name(&self.name)
            .maybe_email(self.email.as_deref().copied())
            .password_hash(&password_hash)
            .build()
            .insert(&mut conn)
            .await?;

        Profile::create(&mut conn, user.id).await?;

        let Some(view) = UserView::find(&mut conn, user.id).await? else {
            // we inserted the row moments ago in this transaction
            return Err(ApiError::unknown());
        };

        conn.commit().await.into_db_error()?;

        let token = LoginClaims::generate(&view.user, app.config.auth.token_expiry_hours)
            .encode(app)?;

        Ok(RegisterResult { user: view, token })
    }
}
