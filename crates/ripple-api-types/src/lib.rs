pub mod comment;
pub mod pagination;
pub mod post;
pub mod routes;
pub mod user;

mod sensitive;
pub use self::sensitive::Sensitive;
