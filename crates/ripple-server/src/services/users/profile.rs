use ripple_db::error::ErrorExt;
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::id::UserId;
use ripple_model::user::{UpdateProfile, UpdateUser, UserView};

use crate::extract::SessionUser;
use crate::App;

#[derive(Debug)]
pub struct GetUserProfile {
    pub id: UserId,
}

impl GetUserProfile {
    #[tracing::instrument(skip(app), name = "services.users.profile.get")]
    pub async fn perform(self, app: &App) -> Result<UserView, ApiError> {
        let mut conn = app.db_read().await?;
        let Some(view) = UserView::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find user specified")
            );
        };

        Ok(view)
    }
}

/// Partial profile update. Absent fields keep their current value.
#[derive(Debug)]
pub struct UpdateUserProfile<'a> {
    pub id: UserId,
    pub display_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}

impl UpdateUserProfile<'_> {
    #[tracing::instrument(skip(app), name = "services.users.profile.update")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<UserView, ApiError> {
        if session_user.id != self.id {
            return Err(ApiError::new(ErrorCategory::Forbidden)
                .message("You cannot edit somebody else's profile"));
        }

        let mut conn = app.db_write().await?;
        if self.display_name.is_some() {
            UpdateUser::builder()
                .id(self.id)
                .maybe_display_name(self.display_name)
                .build()
                .update(&mut conn)
                .await?;
        }

        if self.bio.is_some() || self.avatar_url.is_some() {
            UpdateProfile::builder()
                .id(self.id)
                .maybe_bio(self.bio)
                .maybe_avatar_url(self.avatar_url)
                .build()
                .update(&mut conn)
                .await?;
        }

        let Some(view) = UserView::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find user specified")
            );
        };

        conn.commit().await.into_db_error()?;
        Ok(view)
    }
}
