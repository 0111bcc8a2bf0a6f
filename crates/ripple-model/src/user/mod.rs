use bon::Builder;
use chrono::NaiveDateTime;
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::UserId;

mod follower;
pub use self::follower::*;

mod profile;
pub use self::profile::*;

mod view;
pub use self::view::*;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: UserId,
    pub created: NaiveDateTime,
    pub name: String,

    pub admin: bool,
    pub display_name: Option<String>,
    pub email: Option<String>,

    pub password_hash: String,
    pub updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum UserIdent {
    #[iden = "users"]
    Users,
    Id,
    Created,
    Name,
    Admin,
    DisplayName,
    Email,
    PasswordHash,
    Updated,
}

impl User {
    pub(crate) fn make_view_columns<A: Iden + Clone + 'static>(alias: A) -> Vec<(A, UserIdent)> {
        [
            UserIdent::Id,
            UserIdent::Created,
            UserIdent::Name,
            UserIdent::Admin,
            UserIdent::DisplayName,
            UserIdent::Email,
            UserIdent::PasswordHash,
            UserIdent::Updated,
        ]
        .into_iter()
        .map(|column| (alias.clone(), column))
        .collect()
    }
}

#[derive(Builder)]
pub struct InsertUser<'a> {
    pub name: &'a str,
    pub display_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Partial update of the `users` row. `None` fields are left as they
/// are.
#[derive(Builder)]
pub struct UpdateUser<'a> {
    #[builder(into)]
    pub id: UserId,
    pub display_name: Option<&'a str>,
}
