pub mod comment;
pub mod id;
pub mod post;
pub mod user;

mod postgres;

pub use self::comment::{Comment, CommentView};
pub use self::post::{Post, PostLike, PostView};
pub use self::user::{Follower, Profile, User, UserView};

pub static DB_MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
