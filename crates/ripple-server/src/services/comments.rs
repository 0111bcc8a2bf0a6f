use ripple_api_types::pagination::Pagination;
use ripple_api_types::Sensitive;
use ripple_db::error::ErrorExt;
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::comment::{CommentView, InsertComment};
use ripple_model::id::{CommentId, PostId};
use ripple_model::{Comment, Post};

use crate::extract::SessionUser;
use crate::App;

#[derive(Debug)]
pub struct CreateComment<'a> {
    pub post_id: PostId,
    pub content: Sensitive<&'a str>,
}

impl CreateComment<'_> {
    #[tracing::instrument(skip(app), name = "services.comments.create")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<CommentView, ApiError> {
        if self.content.trim().is_empty() {
            return Err(
                ApiError::new(ErrorCategory::InvalidRequest).message("Your comment cannot be empty")
            );
        }

        let mut conn = app.db_write().await?;
        if Post::find(&mut conn, self.post_id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let comment = InsertComment::builder()
            .author_id(session_user.id)
            .post_id(self.post_id)
            .content(&self.content)
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = CommentView::find(&mut conn, comment.id).await? else {
            return Err(ApiError::unknown());
        };

        conn.commit().await.into_db_error()?;
        Ok(view)
    }
}

#[derive(Debug)]
pub struct ListComments {
    pub post_id: PostId,
    pub pagination: Pagination,
}

impl ListComments {
    #[tracing::instrument(skip(app), name = "services.comments.list")]
    pub async fn perform(self, app: &App) -> Result<Vec<CommentView>, ApiError> {
        let mut conn = app.db_read().await?;
        if Post::find(&mut conn, self.post_id).await?.is_none() {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let comments = CommentView::list_for_post(
            &mut conn,
            self.post_id,
            self.pagination.offset(),
            self.pagination.limit(),
        )
        .await?;

        Ok(comments)
    }
}

#[derive(Debug)]
pub struct DeleteComment {
    pub id: CommentId,
}

impl DeleteComment {
    #[tracing::instrument(skip(app), name = "services.comments.delete")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let Some(comment) = Comment::find(&mut conn, self.id).await? else {
            return Err(
                ApiError::new(ErrorCategory::NotFound).message("Could not find comment specified")
            );
        };

        if comment.author_id != session_user.id {
            return Err(ApiError::new(ErrorCategory::Forbidden)
                .message("You cannot delete somebody else's comment"));
        }

        Comment::delete(&mut conn, self.id).await?;
        conn.commit().await.into_db_error()?;

        Ok(())
    }
}
