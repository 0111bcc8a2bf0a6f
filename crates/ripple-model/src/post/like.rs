use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{PostId, PostLikeId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PostLike {
    pub id: PostLikeId,
    pub created: NaiveDateTime,
    pub user_id: UserId,
    pub post_id: PostId,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum PostLikeIdent {
    #[iden = "post_likes"]
    PostLikes,
    Id,
    Created,
    UserId,
    PostId,
}
