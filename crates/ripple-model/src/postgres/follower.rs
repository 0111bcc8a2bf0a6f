use error_stack::{Result, ResultExt};
use sea_query::{
    Asterisk, Expr, Iden, IntoIden, OnConflict, Order, PostgresQueryBuilder, Query,
    TableRef,
};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::id::UserId;
use crate::user::{Follower, FollowerIdent, UserIdent};
use crate::User;

#[derive(Debug, Error)]
#[error("Could not follow source user to target user")]
pub struct FollowError;

#[derive(Debug, Error)]
#[error("Could not unfollow source user to target user")]
pub struct UnfollowError;

#[derive(Debug, Error)]
#[error("Could not query followers")]
pub struct QueryFollowerError;

#[derive(Debug, Clone, Iden)]
enum LocalIdent {
    /// Alias for `followers`
    F,
    /// Alias for `users`
    U,
}

impl Follower {
    /// Records that `source_id` follows `target_id`. Returns whether
    /// the edge was newly created; a concurrent or repeated follow
    /// loses at the unique index and observes `false`.
    #[tracing::instrument(skip_all, name = "db.followers.follow")]
    pub async fn follow(
        conn: &mut PgConnection,
        source_id: UserId,
        target_id: UserId,
    ) -> Result<bool, FollowError> {
        let (sql, values) = Query::insert()
            .into_table(FollowerIdent::Followers)
            .columns([FollowerIdent::SourceId, FollowerIdent::TargetId])
            .values_panic([source_id.0.into(), target_id.0.into()])
            .on_conflict(
                OnConflict::columns([FollowerIdent::SourceId, FollowerIdent::TargetId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let inserted = sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(FollowError)
            .attach_printable("could not insert follower data")?;

        Ok(inserted.is_some())
    }

    /// Removes the edge if it exists. Returns whether anything was
    /// removed; unfollowing a stranger is a silent no-op.
    #[tracing::instrument(skip_all, name = "db.followers.unfollow")]
    pub async fn unfollow(
        conn: &mut PgConnection,
        source_id: UserId,
        target_id: UserId,
    ) -> Result<bool, UnfollowError> {
        let (sql, values) = Query::delete()
            .from_table(FollowerIdent::Followers)
            .and_where(
                Expr::col(FollowerIdent::SourceId)
                    .eq(source_id.0)
                    .and(Expr::col(FollowerIdent::TargetId).eq(target_id.0)),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let removed = sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UnfollowError)?;

        Ok(removed.is_some())
    }

    #[tracing::instrument(skip_all, name = "db.followers.get")]
    pub async fn get(
        conn: &mut PgConnection,
        source_id: UserId,
        target_id: UserId,
    ) -> Result<Option<Self>, QueryFollowerError> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(FollowerIdent::Followers)
            .and_where(
                Expr::col(FollowerIdent::SourceId)
                    .eq(source_id.0)
                    .and(Expr::col(FollowerIdent::TargetId).eq(target_id.0)),
            )
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryFollowerError)
            .attach_printable("could not find follower data by source or target id")
    }

    /// Users that `user_id` follows, most recent follow first.
    #[tracing::instrument(skip_all, name = "db.followers.list_following")]
    pub async fn list_following(
        conn: &mut PgConnection,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, QueryFollowerError> {
        Self::list_edge_users(conn, user_id, FollowerIdent::SourceId, offset, limit).await
    }

    /// Users that follow `user_id`, most recent follow first.
    #[tracing::instrument(skip_all, name = "db.followers.list_followers")]
    pub async fn list_followers(
        conn: &mut PgConnection,
        user_id: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, QueryFollowerError> {
        Self::list_edge_users(conn, user_id, FollowerIdent::TargetId, offset, limit).await
    }

    async fn list_edge_users(
        conn: &mut PgConnection,
        user_id: UserId,
        where_column: FollowerIdent,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, QueryFollowerError> {
        let joined_column = match where_column {
            FollowerIdent::SourceId => FollowerIdent::TargetId,
            _ => FollowerIdent::SourceId,
        };

        let (sql, values) = Query::select()
            .column((LocalIdent::U, Asterisk))
            .from_as(FollowerIdent::Followers, LocalIdent::F)
            .inner_join(
                TableRef::Table(UserIdent::Users.into_iden()).alias(LocalIdent::U),
                Expr::col((LocalIdent::U, UserIdent::Id))
                    .eq(Expr::col((LocalIdent::F, joined_column))),
            )
            .and_where(Expr::col((LocalIdent::F, where_column)).eq(user_id.0))
            .order_by((LocalIdent::F, FollowerIdent::Created), Order::Desc)
            .order_by((LocalIdent::F, FollowerIdent::Id), Order::Desc)
            .offset(offset)
            .limit(limit)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_all(conn)
            .await
            .change_context(QueryFollowerError)
            .attach_printable("could not list users over follow edges")
    }
}
