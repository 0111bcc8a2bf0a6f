use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::Post;
use crate::user::User;

/// A post with its author and derived like/comment counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author: User,
    pub likes: i64,
    pub comments: i64,
}

impl<'r> FromRow<'r, PgRow> for PostView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            post: Post {
                id: row.try_get("p.id")?,
                created: row.try_get("p.created")?,
                author_id: row.try_get("p.author_id")?,
                content: row.try_get("p.content")?,
                updated: row.try_get("p.updated")?,
            },
            author: User {
                id: row.try_get("u.id")?,
                created: row.try_get("u.created")?,
                name: row.try_get("u.name")?,
                admin: row.try_get("u.admin")?,
                display_name: row.try_get("u.display_name")?,
                email: row.try_get("u.email")?,
                password_hash: row.try_get("u.password_hash")?,
                updated: row.try_get("u.updated")?,
            },
            likes: row.try_get("likes")?,
            comments: row.try_get("comments")?,
        })
    }
}
