use serde::{Deserialize, Serialize};

use crate::user::{UserSummary, UserView};
use crate::Sensitive;

/// Sign up for an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
#[cfg_attr(feature = "server", builder(on(Sensitive<String>, into)))]
pub struct RegisterUser {
    pub name: Sensitive<String>,
    pub email: Option<Sensitive<String>>,
    pub password: Sensitive<String>,
}

/// A response after registration is successfully performed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegisterUserResponse {
    pub user: UserView,
    pub token: String,
}

/// Log in with a name (or email) and password.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
#[cfg_attr(feature = "server", builder(on(Sensitive<String>, into)))]
pub struct LoginUser {
    pub name_or_email: Sensitive<String>,
    pub password: Sensitive<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoginUserResponse {
    pub user: UserView,
    pub token: String,
}

/// Update the profile fields of an existing user.
///
/// Absent fields are left untouched. There is no way to clear a field
/// back to null through this form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "server", derive(bon::Builder))]
pub struct UpdateUserProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// A response after a follow request, whether or not it changed
/// anything. `created` is false when the follow already existed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FollowUserResponse {
    pub following: bool,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnfollowUserResponse {
    pub following: bool,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListFollowsResponse {
    pub users: Vec<UserSummary>,
}
