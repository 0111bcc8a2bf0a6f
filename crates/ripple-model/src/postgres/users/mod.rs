use error_stack::{Result, ResultExt};
use sea_query::{Asterisk, Expr, ExprTrait, Func, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::id::UserId;
use crate::user::{InsertUser, UpdateUser, UserIdent};
use crate::User;

mod view;

#[derive(Debug, Error)]
#[error("Could not query users")]
pub struct QueryUserError;

impl User {
    #[tracing::instrument(skip_all, name = "db.users.find")]
    pub async fn find(conn: &mut PgConnection, id: UserId) -> Result<Option<User>, QueryUserError> {
        // SELECT * FROM users WHERE id = <id>
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(UserIdent::Users)
            .and_where(Expr::col(UserIdent::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryUserError)
            .attach_printable("could not find user by id")
    }

    #[tracing::instrument(skip_all, name = "db.users.find_by_login")]
    pub async fn find_by_login(
        conn: &mut PgConnection,
        entry: &str,
    ) -> Result<Option<User>, QueryUserError> {
        // they should have checked if it is actually an email
        debug_assert_ne!(entry, "_@_@_@_");

        // SELECT * FROM users WHERE lower(name) = $1
        //     OR lower(coalesce(email, '_@_@_@_')) = $1
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(UserIdent::Users)
            .and_where(
                Func::lower(Expr::col(UserIdent::Name))
                    .eq(entry.to_lowercase())
                    .or(Func::lower(Func::coalesce([
                        Expr::col(UserIdent::Email).into(),
                        Expr::val("_@_@_@_").into(),
                    ]))
                    .eq(entry.to_lowercase())),
            )
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryUserError)
            .attach_printable("could not find user by their login credentials")
    }

    #[tracing::instrument(skip_all, name = "db.users.check_username_taken")]
    pub async fn check_username_taken(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<bool, QueryUserError> {
        // SELECT exists(SELECT * FROM users WHERE lower(name) = $1)
        let (sql, values) = Query::select()
            .expr(Expr::exists(
                Query::select()
                    .column(Asterisk)
                    .from(UserIdent::Users)
                    .and_where(Func::lower(Expr::col(UserIdent::Name)).eq(name.to_lowercase()))
                    .take(),
            ))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_scalar_with::<_, bool, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(QueryUserError)
    }

    #[tracing::instrument(skip_all, name = "db.users.check_email_taken")]
    pub async fn check_email_taken(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<bool, QueryUserError> {
        // SELECT exists(SELECT * FROM users WHERE lower(email) = $1)
        let (sql, values) = Query::select()
            .expr(Expr::exists(
                Query::select()
                    .column(Asterisk)
                    .from(UserIdent::Users)
                    .and_where(Func::lower(Expr::col(UserIdent::Email)).eq(email.to_lowercase()))
                    .take(),
            ))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_scalar_with::<_, bool, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(QueryUserError)
    }
}

#[derive(Debug, Error)]
#[error("Could not insert user")]
pub struct InsertUserError;

impl InsertUser<'_> {
    #[tracing::instrument(skip_all, name = "db.users.insert")]
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<User, InsertUserError> {
        // set to `None` if the display name specified is empty
        let display_name = if self.display_name.map(|v| !v.is_empty()).unwrap_or_default() {
            self.display_name
        } else {
            None
        };

        let (sql, values) = Query::insert()
            .into_table(UserIdent::Users)
            .columns([
                UserIdent::Name,
                UserIdent::DisplayName,
                UserIdent::Email,
                UserIdent::PasswordHash,
            ])
            .values_panic([
                self.name.into(),
                display_name.into(),
                self.email.into(),
                self.password_hash.into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertUserError)
    }
}

#[derive(Debug, Error)]
#[error("Could not update user")]
pub struct UpdateUserError;

impl UpdateUser<'_> {
    #[tracing::instrument(skip_all, name = "db.users.update")]
    pub async fn update(&self, conn: &mut PgConnection) -> Result<User, UpdateUserError> {
        let mut query = Query::update();
        query.table(UserIdent::Users);

        if let Some(display_name) = self.display_name {
            query.value(UserIdent::DisplayName, display_name);
        }
        query.value(UserIdent::Updated, Expr::current_timestamp());

        let (sql, values) = query
            .and_where(Expr::col(UserIdent::Id).eq(self.id.0))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(UpdateUserError)
    }
}
