use axum_test::TestServer;
use ripple_db::Pool;
use ripple_error::ApiError;
use std::fmt::Debug;
use std::future::Future;
use tracing::info;

use crate::App;

pub mod users;

/// Builds an [`App`] that never touches a database. For tests that
/// exercise everything but queries.
pub fn build_offline_app() -> App {
    App::new_for_tests(Pool::new_disconnected_for_tests())
}

/// Runs `callback` against an [`App`] backed by its own freshly
/// migrated database. Skips when no test database is configured.
pub async fn with_test_app<F, Fut>(callback: F)
where
    F: FnOnce(App) -> Fut,
    Fut: Future<Output = ()>,
{
    ripple_tracing::init_for_tests();
    ripple_db::testing::with_test_pool(&ripple_model::DB_MIGRATIONS, |pool| async move {
        let app = App::new_for_tests(pool);
        callback(app).await
    })
    .await;
}

/// Like [`with_test_app`] but also spins up an in-process HTTP server
/// with the full router and middleware stack.
pub async fn with_test_server<F, Fut>(callback: F)
where
    F: FnOnce(App, TestServer) -> Fut,
    Fut: Future<Output = ()>,
{
    with_test_app(|app| async move {
        let router = crate::build_axum_router(app.clone());
        let server = TestServer::new(router).expect("unable to initialize test server");

        info!("test server is running");
        callback(app, server).await
    })
    .await;
}

pub trait TestResultExt {
    /// Serializes the error side of a `Result<T, ApiError>` into a
    /// [`serde_json::Value`] for assertions.
    ///
    /// ## Panics
    /// Panics if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, ApiError> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error).unwrap(),
        }
    }
}
