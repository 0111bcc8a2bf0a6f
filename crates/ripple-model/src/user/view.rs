use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{Profile, User};

/// A user with their profile and derived counters. The counters are
/// aggregated at query time, nothing in the schema stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub user: User,
    pub profile: Profile,
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
}

impl<'r> FromRow<'r, PgRow> for UserView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user: User {
                id: row.try_get("u.id")?,
                created: row.try_get("u.created")?,
                name: row.try_get("u.name")?,
                admin: row.try_get("u.admin")?,
                display_name: row.try_get("u.display_name")?,
                email: row.try_get("u.email")?,
                password_hash: row.try_get("u.password_hash")?,
                updated: row.try_get("u.updated")?,
            },
            profile: Profile {
                id: row.try_get("pr.id")?,
                bio: row.try_get("pr.bio")?,
                avatar_url: row.try_get("pr.avatar_url")?,
                updated: row.try_get("pr.updated")?,
            },
            followers: row.try_get("followers")?,
            following: row.try_get("following")?,
            posts: row.try_get("posts")?,
        })
    }
}
