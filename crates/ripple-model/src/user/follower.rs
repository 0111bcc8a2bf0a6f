use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{FollowerId, UserId};

/// A directed follow edge, `source_id` follows `target_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Follower {
    pub id: FollowerId,
    pub created: NaiveDateTime,
    pub source_id: UserId,
    pub target_id: UserId,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum FollowerIdent {
    #[iden = "followers"]
    Followers,
    Id,
    Created,
    SourceId,
    TargetId,
}
