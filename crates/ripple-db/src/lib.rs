mod pool;

pub mod error;
pub mod testing;

pub use self::error::{Error, Result};
pub use self::pool::Pool;

pub type Transaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;
