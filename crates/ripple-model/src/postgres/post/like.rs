use error_stack::{Result, ResultExt};
use sea_query::{Asterisk, Expr, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::id::{PostId, UserId};
use crate::post::{PostLike, PostLikeIdent};

#[derive(Debug, Error)]
#[error("Could not like post")]
pub struct LikePostError;

#[derive(Debug, Error)]
#[error("Could not unlike post")]
pub struct UnlikePostError;

#[derive(Debug, Error)]
#[error("Could not query post likes")]
pub struct QueryPostLikeError;

impl PostLike {
    /// Records a like. Returns whether it was newly created; liking
    /// twice (or racing another request) observes `false`.
    #[tracing::instrument(skip_all, name = "db.post_likes.like")]
    pub async fn like(
        conn: &mut PgConnection,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<bool, LikePostError> {
        let (sql, values) = Query::insert()
            .into_table(PostLikeIdent::PostLikes)
            .columns([PostLikeIdent::UserId, PostLikeIdent::PostId])
            .values_panic([user_id.0.into(), post_id.0.into()])
            .on_conflict(
                OnConflict::columns([PostLikeIdent::UserId, PostLikeIdent::PostId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let inserted = sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(LikePostError)
            .attach_printable("could not insert post like data")?;

        Ok(inserted.is_some())
    }

    /// Removes a like if present. Returns whether anything was
    /// removed.
    #[tracing::instrument(skip_all, name = "db.post_likes.unlike")]
    pub async fn unlike(
        conn: &mut PgConnection,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<bool, UnlikePostError> {
        let (sql, values) = Query::delete()
            .from_table(PostLikeIdent::PostLikes)
            .and_where(
                Expr::col(PostLikeIdent::UserId)
                    .eq(user_id.0)
                    .and(Expr::col(PostLikeIdent::PostId).eq(post_id.0)),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let removed = sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UnlikePostError)?;

        Ok(removed.is_some())
    }

    #[tracing::instrument(skip_all, name = "db.post_likes.get")]
    pub async fn get(
        conn: &mut PgConnection,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<Option<Self>, QueryPostLikeError> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(PostLikeIdent::PostLikes)
            .and_where(
                Expr::col(PostLikeIdent::UserId)
                    .eq(user_id.0)
                    .and(Expr::col(PostLikeIdent::PostId).eq(post_id.0)),
            )
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryPostLikeError)
    }
}
