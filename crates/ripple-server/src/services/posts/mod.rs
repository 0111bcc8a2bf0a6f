use ripple_api_types::pagination::Pagination;
use ripple_api_types::Sensitive;
use ripple_db::error::ErrorExt;
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::id::PostId;
use ripple_model::post::{InsertPost, PostLike, PostView};
use ripple_model::Post;

use crate::extract::SessionUser;
use crate::App;

/// Rejects empty content and content above the configured maximum.
fn check_post_content(app: &App, content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(
            ApiError::new(ErrorCategory::InvalidRequest).message("Your post cannot be empty")
        );
    }

    let max_characters = app.config.content.post_max_characters;
    if content.chars().count() > max_characters {
        return Err(ApiError::new(ErrorCategory::InvalidRequest).message(format!(
            "Your post must not be over {max_characters} characters"
        )));
    }

    Ok(())
}

#[derive(Debug)]
pub struct PublishPost<'a> {
    pub content: Sensitive<&'a str>,
}

impl PublishPost<'_> {
    #[tracing::instrument(skip(app), name = "services.posts.publish")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<PostView, ApiError> {
        check_post_content(app, &self.content)?;

        let mut conn = app.db_write().await?;
        let post = InsertPost::builder()
            .author_id(session_user.id)
            .content(&self.content)
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = PostView::find(&mut conn, post.id).await? else {
            return Err(ApiError::unknown());
        };

        conn.commit().await.into_db_error()?;
        Ok(view)
    }
}

#[derive(Debug)]
pub struct GetPost {
    pub id: PostId,
}

impl GetPost {
    #[tracing::instrument(skip(app), name = "services.posts.get")]
    pub async fn perform(self, app: &App) -> Result<PostView, ApiError> {
        let mut conn = app.db_read().await?;
        let Some(view) = PostView::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        };

        Ok(view)
    }
}

#[derive(Debug)]
pub struct ListLatestPosts {
    pub pagination: Pagination,
}

impl ListLatestPosts {
    #[tracing::instrument(skip(app), name = "services.posts.list_latest")]
    pub async fn perform(self, app: &App) -> Result<Vec<PostView>, ApiError> {
        let mut conn = app.db_read().await?;
        let posts = PostView::list_latest(
            &mut conn,
            self.pagination.offset(),
            self.pagination.limit(),
        )
        .await?;

        Ok(posts)
    }
}

#[derive(Debug)]
pub struct GetPostFeed {
    pub pagination: Pagination,
}

impl GetPostFeed {
    #[tracing::instrument(skip(app), name = "services.posts.feed")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<Vec<PostView>, ApiError> {
        let mut conn = app.db_read().await?;
        let posts = PostView::list_for_user_feed(
            &mut conn,
            session_user.id,
            self.pagination.offset(),
            self.pagination.limit(),
        )
        .await?;

        Ok(posts)
    }
}

#[derive(Debug)]
pub struct EditPost<'a> {
    pub id: PostId,
    pub new_content: Sensitive<&'a str>,
}

impl EditPost<'_> {
    #[tracing::instrument(skip(app), name = "services.posts.edit")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<PostView, ApiError> {
        check_post_content(app, &self.new_content)?;

        let mut conn = app.db_write().await?;
        let Some(post) = Post::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        };

        if post.author_id != session_user.id {
            return Err(ApiError::new(ErrorCategory::Forbidden)
                .message("You cannot edit somebody else's post"));
        }

        ripple_model::post::EditPost::builder()
            .id(self.id)
            .new_content(&self.new_content)
            .build()
            .perform(&mut conn)
            .await?;

        let Some(view) = PostView::find(&mut conn, self.id).await? else {
            return Err(ApiError::unknown());
        };

        conn.commit().await.into_db_error()?;
        Ok(view)
    }
}

#[derive(Debug)]
pub struct DeletePost {
    pub id: PostId,
}

impl DeletePost {
    #[tracing::instrument(skip(app), name = "services.posts.delete")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let Some(post) = Post::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        };

        if post.author_id != session_user.id {
            return Err(ApiError::new(ErrorCategory::Forbidden)
                .message("You cannot delete somebody else's post"));
        }

        Post::delete(&mut conn, self.id).await?;
        conn.commit().await.into_db_error()?;

        Ok(())
    }
}

#[derive(Debug)]
pub struct LikePost {
    pub id: PostId,
}

#[derive(Debug)]
pub struct LikePostResult {
    pub created: bool,
}

impl LikePost {
    #[tracing::instrument(skip(app), name = "services.posts.like")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<LikePostResult, ApiError> {
        let mut conn = app.db_write().await?;
        if Post::find(&mut conn, self.id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let created = PostLike::like(&mut conn, session_user.id, self.id).await?;
        conn.commit().await.into_db_error()?;

        Ok(LikePostResult { created })
    }
}

#[derive(Debug)]
pub struct UnlikePost {
    pub id: PostId,
}

#[derive(Debug)]
pub struct UnlikePostResult {
    pub removed: bool,
}

impl UnlikePost {
    #[tracing::instrument(skip(app), name = "services.posts.unlike")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<UnlikePostResult, ApiError> {
        let mut conn = app.db_write().await?;
        if Post::find(&mut conn, self.id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let removed = PostLike::unlike(&mut conn, session_user.id, self.id).await?;
        conn.commit().await.into_db_error()?;

        Ok(UnlikePostResult { removed })
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_publish_post() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = PublishPost {
                content: Sensitive::new("hello world!"),
            };

            let view = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .unwrap();

            assert_eq!(view.post.content, "hello world!");
            assert_eq!(view.author.id, alice.user.id);
            assert_eq!(view.likes, 0);
            assert_eq!(view.comments, 0);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_empty_content() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let request = PublishPost {
                content: Sensitive::new("   "),
            };

            let error = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({
                    "code": "invalid_request",
                    "message": "Your post cannot be empty",
                }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_content_above_the_limit() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let too_long = "a".repeat(app.config.content.post_max_characters + 1);
            let request = PublishPost {
                content: Sensitive::new(&too_long),
            };

            let error = request
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({ "code": "invalid_request" }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_edit_own_post_only() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::start_session()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let alice_session = alice.get_session_user(&app).await;
            let view = PublishPost {
                content: Sensitive::new("first draft"),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            let error = EditPost {
                id: view.post.id,
                new_content: Sensitive::new("hijacked"),
            }
            .perform(&app, &bob.get_session_user(&app).await)
            .await
            .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({ "code": "forbidden" }),
            );

            let edited = EditPost {
                id: view.post.id,
                new_content: Sensitive::new("final draft"),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            assert_eq!(edited.post.content, "final draft");
            assert!(edited.post.updated.is_some());
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_delete_own_post_only() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::start_session()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let alice_session = alice.get_session_user(&app).await;
            let view = PublishPost {
                content: Sensitive::new("soon to be gone"),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            let error = DeletePost { id: view.post.id }
                .perform(&app, &bob.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({ "code": "forbidden" }),
            );

            DeletePost { id: view.post.id }
                .perform(&app, &alice_session)
                .await
                .unwrap();

            let error = GetPost { id: view.post.id }.perform(&app).await.expect_error_json();
            assert_json_include!(
                actual: error,
                expected: json!({ "code": "not_found" }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn likes_are_idempotent() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let session_user = alice.get_session_user(&app).await;
            let view = PublishPost {
                content: Sensitive::new("like me"),
            }
            .perform(&app, &session_user)
            .await
            .unwrap();

            let first = LikePost { id: view.post.id }
                .perform(&app, &session_user)
                .await
                .unwrap();

            let second = LikePost { id: view.post.id }
                .perform(&app, &session_user)
                .await
                .unwrap();

            assert!(first.created);
            assert!(!second.created);

            let unliked = UnlikePost { id: view.post.id }
                .perform(&app, &session_user)
                .await
                .unwrap();

            let again = UnlikePost { id: view.post.id }
                .perform(&app, &session_user)
                .await
                .unwrap();

            assert!(unliked.removed);
            assert!(!again.removed);
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn liking_a_missing_post_is_not_found() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let error = LikePost { id: PostId(2_000_000) }
                .perform(&app, &alice.get_session_user(&app).await)
                .await
                .expect_error_json();

            assert_json_include!(
                actual: error,
                expected: json!({ "code": "not_found" }),
            );
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn feed_shows_followed_authors_only() {
        test_utils::with_test_app(|app| async move {
            let alice = test_utils::users::start_session()
                .app(&app)
                .name("alice")
                .call()
                .await;

            let bob = test_utils::users::start_session()
                .app(&app)
                .name("bob")
                .call()
                .await;

            let bob_session = bob.get_session_user(&app).await;
            PublishPost {
                content: Sensitive::new("bob's post"),
            }
            .perform(&app, &bob_session)
            .await
            .unwrap();

            let alice_session = alice.get_session_user(&app).await;
            let feed = GetPostFeed {
                pagination: Pagination::default(),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            assert!(feed.is_empty());

            crate::services::users::FollowUser {
                target: Sensitive::new(bob.user.id),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            let feed = GetPostFeed {
                pagination: Pagination::default(),
            }
            .perform(&app, &alice_session)
            .await
            .unwrap();

            assert_eq!(feed.len(), 1);
            assert_eq!(feed[0].author.id, bob.user.id);
        })
        .await;
    }
}
