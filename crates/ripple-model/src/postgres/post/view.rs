use error_stack::{Result, ResultExt};
use sea_query::{
    Alias, Expr, Func, Iden, IntoColumnRef, IntoIden, Order, PostgresQueryBuilder,
    Query, SelectStatement, TableRef,
};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;

use super::QueryPostError;
use crate::comment::CommentIdent;
use crate::id::{PostId, UserId};
use crate::post::{PostIdent, PostLikeIdent, PostView};
use crate::postgres::into_view_aliases;
use crate::user::{FollowerIdent, UserIdent};
use crate::{Post, User};

#[derive(Debug, Clone, Iden)]
enum LocalIdent {
    /// Alias for `posts`
    P,
    /// Alias for `users`
    U,
    /// Alias for `post_likes`
    L,
    /// Alias for `comments`
    C,
    /// Alias for `followers`
    F,
}

impl PostView {
    #[tracing::instrument(skip_all, name = "db.post_view.find")]
    pub async fn find(conn: &mut PgConnection, id: PostId) -> Result<Option<Self>, QueryPostError> {
        let (sql, values) = Self::generate_select_stmt()
            .and_where(Expr::col((LocalIdent::P, PostIdent::Id)).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryPostError)
            .attach_printable("could not find post view from post id")
    }

    /// Latest posts across all users, newest first.
    #[tracing::instrument(skip_all, name = "db.post_view.list_latest")]
    pub async fn list_latest(
        conn: &mut PgConnection,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, QueryPostError> {
        let (sql, values) = Self::generate_select_stmt()
            .order_by((LocalIdent::P, PostIdent::Created), Order::Desc)
            .order_by((LocalIdent::P, PostIdent::Id), Order::Desc)
            .offset(offset)
            .limit(limit)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .change_context(QueryPostError)
            .attach_printable("could not fetch latest posts")
    }

    /// Posts authored by `user_id`, newest first.
    #[tracing::instrument(skip_all, name = "db.post_view.list_for_their_posts")]
    pub async fn list_for_their_posts(
        conn: &mut PgConnection,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, QueryPostError> {
        let (sql, values) = Self::generate_select_stmt()
            .and_where(Expr::col((LocalIdent::P, PostIdent::AuthorId)).eq(user_id.0))
            .order_by((LocalIdent::P, PostIdent::Created), Order::Desc)
            .order_by((LocalIdent::P, PostIdent::Id), Order::Desc)
            .offset(offset)
            .limit(limit)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .change_context(QueryPostError)
            .attach_printable("could not fetch list of posts of a user")
    }

    /// The home feed of `user_id`: posts of everyone they follow,
    /// newest first. Following nobody yields an empty feed.
    #[tracing::instrument(skip_all, name = "db.post_view.list_for_user_feed")]
    pub async fn list_for_user_feed(
        conn: &mut PgConnection,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, QueryPostError> {
        let (sql, values) = Self::generate_select_stmt()
            .inner_join(
                TableRef::Table(FollowerIdent::Followers.into_iden()).alias(LocalIdent::F),
                Expr::col((LocalIdent::F, FollowerIdent::TargetId))
                    .eq(Expr::col((LocalIdent::P, PostIdent::AuthorId))),
            )
            .and_where(Expr::col((LocalIdent::F, FollowerIdent::SourceId)).eq(user_id.0))
            .order_by((LocalIdent::P, PostIdent::Created), Order::Desc)
            .order_by((LocalIdent::P, PostIdent::Id), Order::Desc)
            .offset(offset)
            .limit(limit)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .change_context(QueryPostError)
            .attach_printable("could not fetch list of posts for a user feed")
    }

    fn generate_select_stmt() -> SelectStatement {
        Query::select()
            .exprs(into_view_aliases(
                Post::make_view_columns(LocalIdent::P).into_iter(),
            ))
            .exprs(into_view_aliases(
                User::make_view_columns(LocalIdent::U).into_iter(),
            ))
            .expr_as(
                Func::count_distinct(Expr::col((LocalIdent::L, PostLikeIdent::Id))),
                Alias::new("likes"),
            )
            .expr_as(
                Func::count_distinct(Expr::col((LocalIdent::C, CommentIdent::Id))),
                Alias::new("comments"),
            )
            .from_as(PostIdent::Posts, LocalIdent::P)
            .inner_join(
                TableRef::Table(UserIdent::Users.into_iden()).alias(LocalIdent::U),
                Expr::col((LocalIdent::U, UserIdent::Id))
                    .eq(Expr::col((LocalIdent::P, PostIdent::AuthorId))),
            )
            .left_join(
                TableRef::Table(PostLikeIdent::PostLikes.into_iden()).alias(LocalIdent::L),
                Expr::col((LocalIdent::L, PostLikeIdent::PostId))
                    .eq(Expr::col((LocalIdent::P, PostIdent::Id))),
            )
            .left_join(
                TableRef::Table(CommentIdent::Comments.into_iden()).alias(LocalIdent::C),
                Expr::col((LocalIdent::C, CommentIdent::PostId))
                    .eq(Expr::col((LocalIdent::P, PostIdent::Id))),
            )
            .group_by_columns([
                (LocalIdent::P, PostIdent::Id).into_column_ref(),
                (LocalIdent::U, UserIdent::Id).into_column_ref(),
            ])
            .take()
    }
}
