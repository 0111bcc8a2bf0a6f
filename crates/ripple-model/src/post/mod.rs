use bon::Builder;
use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{PostId, UserId};

mod like;
pub use self::like::*;

mod view;
pub use self::view::*;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: PostId,
    pub created: NaiveDateTime,
    pub author_id: UserId,
    pub content: String,
    pub updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum PostIdent {
    #[iden = "posts"]
    Posts,
    Id,
    Created,
    AuthorId,
    Content,
    Updated,
}

impl Post {
    pub(crate) fn make_view_columns<A: Iden + Clone + 'static>(alias: A) -> Vec<(A, PostIdent)> {
        [
            PostIdent::Id,
            PostIdent::Created,
            PostIdent::AuthorId,
            PostIdent::Content,
            PostIdent::Updated,
        ]
        .into_iter()
        .map(|column| (alias.clone(), column))
        .collect()
    }
}

#[derive(Builder)]
pub struct InsertPost<'a> {
    #[builder(into)]
    pub author_id: UserId,
    pub content: &'a str,
}

#[derive(Builder)]
pub struct EditPost<'a> {
    #[builder(into)]
    pub id: PostId,
    pub new_content: &'a str,
}
