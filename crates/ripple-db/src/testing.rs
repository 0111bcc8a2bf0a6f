use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Connection};
use std::future::Future;
use std::str::FromStr;

use crate::Pool;

/// Runs `callback` against a freshly created and migrated database.
///
/// Every call creates its own uniquely named database on the server
/// behind `RIPPLE_TEST_DATABASE_URL` and drops it afterwards, so tests
/// can run in parallel without stepping on each other. A panicking
/// test leaves its database behind for inspection.
///
/// When `RIPPLE_TEST_DATABASE_URL` is unset the test is skipped with a
/// note, database suites still pass on machines without Postgres.
pub async fn with_test_pool<F, Fut>(migrator: &Migrator, callback: F)
where
    F: FnOnce(Pool) -> Fut,
    Fut: Future<Output = ()>,
{
    let Ok(url) = std::env::var("RIPPLE_TEST_DATABASE_URL") else {
        eprintln!("skipping database test: `RIPPLE_TEST_DATABASE_URL` is not set");
        return;
    };

    let admin_opts =
        PgConnectOptions::from_str(&url).expect("invalid `RIPPLE_TEST_DATABASE_URL`");

    let db_name = format!("ripple_test_{}", uuid::Uuid::now_v7().simple());
    let mut admin = admin_opts
        .connect()
        .await
        .expect("failed to connect to the test database server");

    sqlx::query(&format!(r#"CREATE DATABASE "{db_name}""#))
        .execute(&mut admin)
        .await
        .expect("failed to create test database");

    let test_opts = admin_opts.clone().database(&db_name);

    let mut setup_conn = test_opts
        .connect()
        .await
        .expect("failed to connect to the test database");

    migrator
        .run(&mut setup_conn)
        .await
        .expect("failed to apply migrations");

    setup_conn
        .close()
        .await
        .expect("failed to close setup connection");

    let inner = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(test_opts);

    let pool = Pool::from_inner(inner);
    callback(pool.clone()).await;
    pool.close().await;

    sqlx::query(&format!(r#"DROP DATABASE "{db_name}" WITH (FORCE)"#))
        .execute(&mut admin)
        .await
        .expect("failed to drop test database");

    admin
        .close()
        .await
        .expect("failed to close admin connection");
}
