use bon::Builder;
use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::UserId;

/// The 1:1 companion row of `users`, created in the same transaction
/// as the user itself.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Profile {
    pub id: UserId,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum ProfileIdent {
    #[iden = "profiles"]
    Profiles,
    Id,
    Bio,
    AvatarUrl,
    Updated,
}

impl Profile {
    pub(crate) fn make_view_columns<A: Iden + Clone + 'static>(alias: A) -> Vec<(A, ProfileIdent)> {
        [
            ProfileIdent::Id,
            ProfileIdent::Bio,
            ProfileIdent::AvatarUrl,
            ProfileIdent::Updated,
        ]
        .into_iter()
        .map(|column| (alias.clone(), column))
        .collect()
    }
}

#[derive(Builder)]
pub struct UpdateProfile<'a> {
    #[builder(into)]
    pub id: UserId,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}
