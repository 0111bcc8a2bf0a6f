mod follow;
mod login;
mod profile;
mod register;

pub use self::follow::{
    FollowUser, FollowUserResult, ListFollowers, ListFollowing, UnfollowUser, UnfollowUserResult,
};
pub use self::login::{Login, LoginResponse};
pub use self::profile::{GetUserProfile, UpdateUserProfile};
pub use self::register::{Register, RegisterResult};
