use ripple_api_types::pagination::Pagination;
use ripple_api_types::Sensitive;
use ripple_db::error::ErrorExt;
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::id::UserId;
use ripple_model::user::Follower;
use ripple_model::User;

use crate::extract::SessionUser;
use crate::App;

#[derive(Debug)]
pub struct FollowUser {
    pub target: Sensitive<UserId>,
}

#[derive(Debug)]
pub struct FollowUserResult {
    pub created: bool,
}

impl FollowUser {
    #[tracing::instrument(skip(app), name = "services.users.follow")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<FollowUserResult, ApiError> {
        // The target user must not be themselves
        if session_user.id == *self.target.value() {
            return Err(ApiError::new(ErrorCategory::InvalidRequest)
                .message("You cannot follow yourself"));
        }

        let mut conn = app.db_write().await?;
        let Some(target) = User::find(&mut conn, *self.target.value()).await? else {
            let error =
                ApiError::new(ErrorCategory::NotFound).message("Could not find user specified");

            return Err(error);
        };

        let created = Follower::follow(&mut conn, session_user.id, target.id).await?;
        conn.commit().await.into_db_error()?;

        Ok(FollowUserResult { created })
    }
}

#[derive(Debug)]
pub struct UnfollowUser {
    pub target: Sensitive<UserId>,
}

#[derive(Debug)]
pub struct UnfollowUserResult {
    pub removed: bool,
}

impl UnfollowUser {
    #[tracing::instrument(skip(app), name = "services.users.unfollow")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<UnfollowUserResult, ApiError> {
        if session_user.id == *self.target.value() {
            return Err(ApiError::new(ErrorCategory::InvalidRequest)
                .message("You cannot unfollow yourself"));
        }

        let mut conn = app.db_write().await?;
        let removed = Follower::unfollow(&mut conn, session_user.id, *self.target.value()).await?;
        conn.commit().await.into_db_error()?;

        Ok(UnfollowUserResult { removed })
    }
}

#[derive(Debug)]
pub struct ListFollowing {
    pub id: UserId,
    pub pagination: Pagination,
}

impl ListFollowing {
    #[tracing::instrument(skip(app), name = "services.users.list_following")]
    pub async fn perform(self, app: &App) -> Result<Vec<User>, ApiError> {
        let mut conn = app.db_read().await?;
        if User::find(&mut conn, self.id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find user specified")
            );
        }

        let users = Follower::list_following(
            &mut conn,
            self.id,
            self.pagination.offset(),
            self.pagination.limit(),
        )
        .await?;

        Ok(users)
    }
}

#[derive(Debug)]
pub struct ListFollowers {
    pub id: UserId,
    pub pagination: Pagination,
}

impl ListFollowers {
    #[tracing::instrument(skip(app), name = "services.users.list_followers")]
    pub async fn perform(self, app: &App) -> Result<Vec<User>, ApiError> {
        let mut conn = app.db_read().await?;
        if User::find(&mut conn, self.id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find user specified")
            );
        }

        let users = Follower::list_followers(
            &mut conn,
            self.id,
            self.pagination.offset(),
            self.pagination.limit(),
        )
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_follow_user() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::register()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let request = FollowUser {
                target: Sensitive::new(bob.user.id),
            };

            let result = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .unwrap();

            assert!(result.created);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn repeated_follow_is_not_created_twice() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::register()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let session_user = alice.get_session_user(&app).await;
            let first = FollowUser {
                target: Sensitive::new(bob.user.id),
            }
            .perform(&app, &session_user)
            .await
            .unwrap();

            let second = FollowUser {
                target: Sensitive::new(bob.user.id),
            }
            .perform(&app, &session_user)
            .await
            .unwrap();

            assert!(first.created);
            assert!(!second.created);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_follow_themselves() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = FollowUser {
                target: Sensitive::new(alice.user.id),
            };

            let error = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({
                    "code": "invalid_request",
                    "message": "You cannot follow yourself",
                }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_if_target_user_not_found() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = FollowUser {
                target: Sensitive::new(UserId(2_000_000)),
            };

            let error = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({
                    "code": "not_found",
                    "message": "Could not find user specified",
                }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn unfollowing_a_stranger_removes_nothing() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::register()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let request = UnfollowUser {
                target: Sensitive::new(bob.user.id),
            };

            let result = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .unwrap();

            assert!(!result.removed);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_both_directions() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::register()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let session_user = alice.get_session_user(&app).await;
            FollowUser {
                target: Sensitive::new(bob.user.id),
            }
            .perform(&app, &session_user)
            .await
            .unwrap();

            let following = ListFollowing {
                id: alice.user.id,
                pagination: Pagination::default(),
            }
            .perform(&app)
            .await
            .unwrap();

            assert_eq!(following.len(), 1);
            assert_eq!(following[0].id, bob.user.id);

            let followers = ListFollowers {
                id: bob.user.id,
                pagination: Pagination::default(),
            }
            .perform(&app)
            .await
            .unwrap();

            assert_eq!(followers.len(), 1);
            assert_eq!(followers[0].id, alice.user.id);
        })
        .await;
    }
}
