use error_stack::{Result, ResultExt};
use sea_query::{
    Asterisk, Expr, Iden, IntoColumnRef, IntoIden, Order, PostgresQueryBuilder, Query,
    SelectStatement, TableRef,
};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::comment::{CommentIdent, CommentView, InsertComment};
use crate::id::{CommentId, PostId};
use crate::postgres::into_view_aliases;
use crate::user::UserIdent;
use crate::{Comment, User};

#[derive(Debug, Error)]
#[error("Could not query comments")]
pub struct QueryCommentError;

#[derive(Debug, Error)]
#[error("Could not insert comment")]
pub struct InsertCommentError;

#[derive(Debug, Error)]
#[error("Could not delete comment")]
pub struct DeleteCommentError;

#[derive(Debug, Clone, Iden)]
enum LocalIdent {
    /// Alias for `comments`
    C,
    /// Alias for `users`
    U,
}

impl Comment {
    #[tracing::instrument(skip_all, name = "db.comments.find")]
    pub async fn find(
        conn: &mut PgConnection,
        id: CommentId,
    ) -> Result<Option<Comment>, QueryCommentError> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(CommentIdent::Comments)
            .and_where(Expr::col(CommentIdent::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryCommentError)
            .attach_printable("could not find comment by id")
    }

    /// Returns whether a row was deleted.
    #[tracing::instrument(skip_all, name = "db.comments.delete")]
    pub async fn delete(
        conn: &mut PgConnection,
        id: CommentId,
    ) -> Result<bool, DeleteCommentError> {
        let (sql, values) = Query::delete()
            .from_table(CommentIdent::Comments)
            .and_where(Expr::col(CommentIdent::Id).eq(id.0))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let deleted = sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(DeleteCommentError)?;

        Ok(deleted.is_some())
    }
}

impl InsertComment<'_> {
    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<Comment, InsertCommentError> {
        let (sql, values) = Query::insert()
            .into_table(CommentIdent::Comments)
            .columns([
                CommentIdent::AuthorId,
                CommentIdent::PostId,
                CommentIdent::Content,
            ])
            .values_panic([
                self.author_id.0.into(),
                self.post_id.0.into(),
                self.content.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertCommentError)
    }
}

impl CommentView {
    #[tracing::instrument(skip_all, name = "db.comment_view.find")]
    pub async fn find(
        conn: &mut PgConnection,
        id: CommentId,
    ) -> Result<Option<Self>, QueryCommentError> {
        let (sql, values) = Self::generate_select_stmt()
            .and_where(Expr::col((LocalIdent::C, CommentIdent::Id)).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryCommentError)
            .attach_printable("could not find comment view from comment id")
    }

    /// Comments under a post in the order they were written.
    #[tracing::instrument(skip_all, name = "db.comment_view.list_for_post")]
    pub async fn list_for_post(
        conn: &mut PgConnection,
        post_id: PostId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, QueryCommentError> {
        let (sql, values) = Self::generate_select_stmt()
            .and_where(Expr::col((LocalIdent::C, CommentIdent::PostId)).eq(post_id.0))
            .order_by((LocalIdent::C, CommentIdent::Created), Order::Asc)
            .order_by((LocalIdent::C, CommentIdent::Id), Order::Asc)
            .offset(offset)
            .limit(limit)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .change_context(QueryCommentError)
            .attach_printable("could not fetch list of comments of a post")
    }

    fn generate_select_stmt() -> SelectStatement {
        Query::select()
            .exprs(into_view_aliases(
                Comment::make_view_columns(LocalIdent::C).into_iter(),
            ))
            .exprs(into_view_aliases(
                User::make_view_columns(LocalIdent::U).into_iter(),
            ))
            .from_as(CommentIdent::Comments, LocalIdent::C)
            .inner_join(
                TableRef::Table(UserIdent::Users.into_iden()).alias(LocalIdent::U),
                Expr::col((LocalIdent::U, UserIdent::Id))
                    .eq(Expr::col((LocalIdent::C, CommentIdent::AuthorId))),
            )
            .group_by_columns([
                (LocalIdent::C, CommentIdent::Id).into_column_ref(),
                (LocalIdent::U, UserIdent::Id).into_column_ref(),
            ])
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postgres::post::tests::generate_post;
    use crate::postgres::users::tests::generate_user;
    use crate::DB_MIGRATIONS;
    use ripple_db::testing::with_test_pool;

    #[tokio::test]
    async fn lists_in_written_order() {
        with_test_pool(&DB_MIGRATIONS, |pool| async move {
            let mut conn = pool.acquire().await.unwrap();
            let alice = generate_user(&mut conn, "alice").await;
            let bob = generate_user(&mut conn, "bob").await;
            let post = generate_post(&mut conn, alice.id).await;

            let first = InsertComment::builder()
                .author_id(bob.id)
                .post_id(post.id)
                .content("first")
                .build()
                .insert(&mut conn)
                .await
                .unwrap();

            let second = InsertComment::builder()
                .author_id(alice.id)
                .post_id(post.id)
                .content("second")
                .build()
                .insert(&mut conn)
                .await
                .unwrap();

            let comments = CommentView::list_for_post(&mut conn, post.id, 0, 10)
                .await
                .unwrap();

            assert_eq!(comments.len(), 2);
            assert_eq!(comments[0].comment, first);
            assert_eq!(comments[0].author, bob);
            assert_eq!(comments[1].comment, second);
            assert_eq!(comments[1].author, alice);
        })
        .await;
    }

    #[tokio::test]
    async fn deletes_by_id() {
        with_test_pool(&DB_MIGRATIONS, |pool| async move {
            let mut conn = pool.acquire().await.unwrap();
            let alice = generate_user(&mut conn, "alice").await;
            let post = generate_post(&mut conn, alice.id).await;

            let comment = InsertComment::builder()
                .author_id(alice.id)
                .post_id(post.id)
                .content("oops")
                .build()
                .insert(&mut conn)
                .await
                .unwrap();

            assert!(Comment::delete(&mut conn, comment.id).await.unwrap());
            assert!(!Comment::delete(&mut conn, comment.id).await.unwrap());

            let found = Comment::find(&mut conn, comment.id).await.unwrap();
            assert!(found.is_none());
        })
        .await;
    }
}
