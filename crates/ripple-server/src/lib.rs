mod app;

pub mod auth;
pub mod extract;
pub mod headers;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod test_utils;

pub use self::app::App;
pub use self::routes::build_axum_router;
