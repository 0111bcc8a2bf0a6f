use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;

use crate::error::{Error, ErrorExt, ReportExt, Result};
use crate::{PoolConnection, Transaction};

/// A lazily connecting Postgres pool.
///
/// Connecting is lazy so a database that is briefly down at boot does
/// not take the whole service with it; callers get
/// [`Error::UnhealthyPool`] until the database comes back.
#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    /// Builds a pool for `url` with the shared limits from the
    /// database config. The same config drives both the primary and
    /// the replica pool, only the url differs.
    pub async fn new(config: &ripple_config::Database, url: &str) -> Result<Self> {
        let pool_opts = PgPoolOptions::new()
            .acquire_timeout(config.connection_timeout())
            .min_connections(config.min_connections)
            .max_connections(config.max_connections);

        let mut connect_opts =
            PgConnectOptions::from_str(url).change_context(Error::InvalidUrl)?;

        if config.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Require);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {}
            Err(err) => return Err(err),
        }

        Ok(pool)
    }

    pub(crate) fn from_inner(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Builds a lazy pool that never gets connected. For tests that
    /// exercise everything but the database.
    #[must_use]
    pub fn new_disconnected_for_tests() -> Self {
        Self {
            pool: PgPoolOptions::new().connect_lazy_with(PgConnectOptions::new()),
        }
    }

    #[inline(always)]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline(always)]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.transaction", skip_all)]
    pub async fn begin(&self) -> Result<Transaction<'static>> {
        if let Some(inner) = self.pool.try_begin().await.into_db_error()? {
            Ok(inner)
        } else if !self.is_healthy() {
            Err(Report::new(Error::UnhealthyPool))
        } else {
            self.pool.begin().await.into_db_error()
        }
    }

    #[tracing::instrument(name = "db.acquire", skip_all)]
    pub async fn acquire(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            Ok(inner)
        } else if !self.is_healthy() {
            Err(Report::new(Error::UnhealthyPool))
        } else {
            self.pool.acquire().await.into_db_error()
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
            Err(e) => Err(Report::new(Error::Internal(e))),
        }
    }

    /// Closes every connection and blocks new acquires. Used by the
    /// test harness before the backing database is dropped.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}
