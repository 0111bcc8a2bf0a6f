use error_stack::{Result, ResultExt};
use sea_query::{
    Alias, Expr, Func, Iden, IntoColumnRef, IntoIden, PostgresQueryBuilder, Query,
    SelectStatement, TableRef,
};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;

use super::QueryUserError;
use crate::id::UserId;
use crate::post::PostIdent;
use crate::postgres::into_view_aliases;
use crate::user::{FollowerIdent, Profile, ProfileIdent, UserIdent, UserView};
use crate::User;

#[derive(Debug, Clone, Iden)]
enum LocalIdent {
    /// Alias for `users`
    U,
    /// Alias for `profiles`
    Pr,
    /// Alias for `followers` joined on `target_id` (who follows them)
    Fin,
    /// Alias for `followers` joined on `source_id` (who they follow)
    Fout,
    /// Alias for `posts`
    P,
}

impl UserView {
    #[tracing::instrument(skip_all, name = "db.user_view.find")]
    pub async fn find(conn: &mut PgConnection, id: UserId) -> Result<Option<Self>, QueryUserError> {
        let (sql, values) = Self::generate_select_stmt()
            .and_where(Expr::col((LocalIdent::U, UserIdent::Id)).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryUserError)
            .attach_printable("could not find user view from user id")
    }

    fn generate_select_stmt() -> SelectStatement {
        Query::select()
            .exprs(into_view_aliases(
                User::make_view_columns(LocalIdent::U).into_iter(),
            ))
            .exprs(into_view_aliases(
                Profile::make_view_columns(LocalIdent::Pr).into_iter(),
            ))
            .expr_as(
                Func::count_distinct(Expr::col((LocalIdent::Fin, FollowerIdent::Id))),
                Alias::new("followers"),
            )
            .expr_as(
                Func::count_distinct(Expr::col((LocalIdent::Fout, FollowerIdent::Id))),
                Alias::new("following"),
            )
            .expr_as(
                Func::count_distinct(Expr::col((LocalIdent::P, PostIdent::Id))),
                Alias::new("posts"),
            )
            .from_as(UserIdent::Users, LocalIdent::U)
            .inner_join(
                TableRef::Table(ProfileIdent::Profiles.into_iden()).alias(LocalIdent::Pr),
                Expr::col((LocalIdent::Pr, ProfileIdent::Id))
                    .eq(Expr::col((LocalIdent::U, UserIdent::Id))),
            )
            .left_join(
                TableRef::Table(FollowerIdent::Followers.into_iden()).alias(LocalIdent::Fin),
                Expr::col((LocalIdent::Fin, FollowerIdent::TargetId))
                    .eq(Expr::col((LocalIdent::U, UserIdent::Id))),
            )
            .left_join(
                TableRef::Table(FollowerIdent::Followers.into_iden()).alias(LocalIdent::Fout),
                Expr::col((LocalIdent::Fout, FollowerIdent::SourceId))
                    .eq(Expr::col((LocalIdent::U, UserIdent::Id))),
            )
            .left_join(
                TableRef::Table(PostIdent::Posts.into_iden()).alias(LocalIdent::P),
                Expr::col((LocalIdent::P, PostIdent::AuthorId))
                    .eq(Expr::col((LocalIdent::U, UserIdent::Id))),
            )
            .group_by_columns([
                (LocalIdent::U, UserIdent::Id).into_column_ref(),
                (LocalIdent::Pr, ProfileIdent::Id).into_column_ref(),
            ])
            .take()
    }
}

#[cfg(test)]
mod tests {
    use crate::post::InsertPost;
    use crate::postgres::users::tests::generate_user;
    use crate::user::{Follower, UserView};
    use crate::DB_MIGRATIONS;
    use ripple_db::testing::with_test_pool;

    #[tokio::test]
    async fn counts_are_derived() {
        with_test_pool(&DB_MIGRATIONS, |pool| async move {
            let mut conn = pool.acquire().await.unwrap();
            let alice = generate_user(&mut conn, "alice").await;
            let bob = generate_user(&mut conn, "bob").await;
            let caryl = generate_user(&mut conn, "caryl").await;

            Follower::follow(&mut conn, bob.id, alice.id).await.unwrap();
            Follower::follow(&mut conn, caryl.id, alice.id).await.unwrap();
            Follower::follow(&mut conn, alice.id, bob.id).await.unwrap();

            InsertPost::builder()
                .author_id(alice.id)
                .content("Hello, World!")
                .build()
                .insert(&mut conn)
                .await
                .unwrap();

            let view = UserView::find(&mut conn, alice.id).await.unwrap().unwrap();
            assert_eq!(view.user, alice);
            assert_eq!(view.followers, 2);
            assert_eq!(view.following, 1);
            assert_eq!(view.posts, 1);
        })
        .await;
    }

    #[tokio::test]
    async fn finds_nothing_for_unknown_user() {
        with_test_pool(&DB_MIGRATIONS, |pool| async move {
            let mut conn = pool.acquire().await.unwrap();
            let view = UserView::find(&mut conn, 42.into()).await.unwrap();
            assert!(view.is_none());
        })
        .await;
    }
}
