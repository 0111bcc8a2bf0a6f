use bon::Builder;
use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::id::{CommentId, PostId, UserId};
use crate::user::User;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub created: NaiveDateTime,
    pub author_id: UserId,
    pub post_id: PostId,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum CommentIdent {
    #[iden = "comments"]
    Comments,
    Id,
    Created,
    AuthorId,
    PostId,
    Content,
}

impl Comment {
    pub(crate) fn make_view_columns<A: Iden + Clone + 'static>(alias: A) -> Vec<(A, CommentIdent)> {
        [
            CommentIdent::Id,
            CommentIdent::Created,
            CommentIdent::AuthorId,
            CommentIdent::PostId,
            CommentIdent::Content,
        ]
        .into_iter()
        .map(|column| (alias.clone(), column))
        .collect()
    }
}

#[derive(Builder)]
pub struct InsertComment<'a> {
    #[builder(into)]
    pub author_id: UserId,
    #[builder(into)]
    pub post_id: PostId,
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: User,
}

impl<'r> FromRow<'r, PgRow> for CommentView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            comment: Comment {
                id: row.try_get("c.id")?,
                created: row.try_get("c.created")?,
                author_id: row.try_get("c.author_id")?,
                post_id: row.try_get("c.post_id")?,
                content: row.try_get("c.content")?,
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
        })
    }
}
