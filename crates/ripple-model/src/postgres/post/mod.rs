use error_stack::{Result, ResultExt};
use sea_query::{Asterisk, Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::id::PostId;
use crate::post::{EditPost, InsertPost, PostIdent};
use crate::Post;

mod like;
mod view;

#[derive(Debug, Error)]
#[error("Could not query posts")]
pub struct QueryPostError;

impl Post {
    #[tracing::instrument(skip_all, name = "db.posts.find")]
    pub async fn find(conn: &mut PgConnection, id: PostId) -> Result<Option<Post>, QueryPostError> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(PostIdent::Posts)
            .and_where(Expr::col(PostIdent::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryPostError)
            .attach_printable("could not find post by id")
    }
}

#[derive(Debug, Error)]
#[error("Could not publish post")]
pub struct PublishPostError;

impl InsertPost<'_> {
    #[tracing::instrument(skip_all, name = "db.posts.insert")]
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<Post, PublishPostError> {
        let (sql, values) = Query::insert()
            .into_table(PostIdent::Posts)
            .columns([PostIdent::AuthorId, PostIdent::Content])
            .values_panic([self.author_id.0.into(), self.content.into()])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(PublishPostError)
    }
}

#[derive(Debug, Error)]
#[error("Could not edit post")]
pub struct EditPostError;

impl EditPost<'_> {
    /// Replaces the content and stamps `updated`. Returns `None` when
    /// the post does not exist.
    #[tracing::instrument(skip_all, name = "db.posts.edit")]
    pub async fn perform(&self, conn: &mut PgConnection) -> Result<Option<Post>, EditPostError> {
        let (sql, values) = Query::update()
            .table(PostIdent::Posts)
            .value(PostIdent::Content, self.new_content)
            .value(PostIdent::Updated, Expr::current_timestamp())
            .and_where(Expr::col(PostIdent::Id).eq(self.id.0))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(EditPostError)
    }
}

#[derive(Debug, Error)]
#[error("Could not delete post")]
pub struct DeletePostError;

impl Post {
    /// One `DELETE` statement; dependent likes and comments go with it
    /// through the schema's cascades. Returns whether a row was
    /// deleted.
    #[tracing::instrument(skip_all, name = "db.posts.delete")]
    pub async fn delete(conn: &mut PgConnection, id: PostId) -> Result<bool, DeletePostError> {
        let (sql, values) = Query::delete()
            .from_table(PostIdent::Posts)
            .and_where(Expr::col(PostIdent::Id).eq(id.0))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let deleted = sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(DeletePostError)?;

        Ok(deleted.is_some())
    }
}
