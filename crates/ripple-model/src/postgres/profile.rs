use error_stack::{Result, ResultExt};
use sea_query::{Asterisk, Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::PgConnection;
use thiserror::Error;

use crate::id::UserId;
use crate::user::{Profile, ProfileIdent, UpdateProfile};

#[derive(Debug, Error)]
#[error("Could not query profiles")]
pub struct QueryProfileError;

#[derive(Debug, Error)]
#[error("Could not create profile")]
pub struct CreateProfileError;

#[derive(Debug, Error)]
#[error("Could not update profile")]
pub struct UpdateProfileError;

impl Profile {
    #[tracing::instrument(skip_all, name = "db.profiles.find")]
    pub async fn find(
        conn: &mut PgConnection,
        id: UserId,
    ) -> Result<Option<Profile>, QueryProfileError> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(ProfileIdent::Profiles)
            .and_where(Expr::col(ProfileIdent::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(QueryProfileError)
            .attach_printable("could not find profile by user id")
    }

    /// Creates the empty companion row for a freshly inserted user.
    /// Called inside the registration transaction.
    #[tracing::instrument(skip_all, name = "db.profiles.create")]
    pub async fn create(
        conn: &mut PgConnection,
        id: UserId,
    ) -> Result<Profile, CreateProfileError> {
        let (sql, values) = Query::insert()
            .into_table(ProfileIdent::Profiles)
            .columns([ProfileIdent::Id])
            .values_panic([id.0.into()])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(CreateProfileError)
    }
}

impl UpdateProfile<'_> {
    #[tracing::instrument(skip_all, name = "db.profiles.update")]
    pub async fn update(&self, conn: &mut PgConnection) -> Result<Profile, UpdateProfileError> {
        let mut query = Query::update();
        query.table(ProfileIdent::Profiles);

        if let Some(bio) = self.bio {
            query.value(ProfileIdent::Bio, bio);
        }
        if let Some(avatar_url) = self.avatar_url {
            query.value(ProfileIdent::AvatarUrl, avatar_url);
        }
        query.value(ProfileIdent::Updated, Expr::current_timestamp());

        let (sql, values) = query
            .and_where(Expr::col(ProfileIdent::Id).eq(self.id.0))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(UpdateProfileError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postgres::users::tests::generate_user;
    use crate::DB_MIGRATIONS;
    use ripple_db::testing::with_test_pool;

    #[tokio::test]
    async fn starts_empty_and_updates() {
        with_test_pool(&DB_MIGRATIONS, |pool| async move {
            let mut conn = pool.acquire().await.unwrap();
            let alice = generate_user(&mut conn, "alice").await;

            let profile = Profile::find(&mut conn, alice.id).await.unwrap().unwrap();
            assert_eq!(profile.bio, "");
            assert_eq!(profile.avatar_url, None);

            let profile = UpdateProfile::builder()
                .id(alice.id)
                .bio("hello there")
                .avatar_url("https://cdn.example.com/alice.png")
                .build()
                .update(&mut conn)
                .await
                .unwrap();

            assert_eq!(profile.bio, "hello there");
            assert_eq!(
                profile.avatar_url.as_deref(),
                Some("https://cdn.example.com/alice.png")
            );
            assert!(profile.updated.is_some());
        })
        .await;
    }
}
