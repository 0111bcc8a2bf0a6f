use axum::extract::{FromRequestParts, State};
use error_stack::{Result, ResultExt};
use jsonwebtoken::{DecodingKey, EncodingKey};
use ripple_db::{Pool, PoolConnection, Transaction};
use ripple_error::{ApiError, ErrorCategory};
use std::sync::Arc;
use thiserror::Error;
use tracing::{trace, warn};

use self::private::AppInner;

mod private;
mod validators;

#[derive(Clone, FromRequestParts)]
#[from_request(via(State))]
#[must_use]
pub struct App(Arc<AppInner>);

#[derive(Debug, Error)]
#[error("Could not initialize server application")]
pub struct AppError;

impl App {
    pub async fn new(config: ripple_config::Config) -> Result<Self, AppError> {
        let primary_db = Pool::new(&config.database, &config.database.url)
            .await
            .change_context(AppError)
            .attach_printable("could not build primary database pool")?;

        let replica_db = match config.database.replica_url.as_deref() {
            Some(url) => Some(
                Pool::new(&config.database, url)
                    .await
                    .change_context(AppError)
                    .attach_printable("could not build replica database pool")?,
            ),
            None => None,
        };

        let (jwt_encode, jwt_decode) = Self::setup_jwt_keys(&config);
        let inner = Arc::new(AppInner {
            config: Arc::new(config),

            primary_db,
            replica_db,

            jwt_encode,
            jwt_decode,
        });

        Ok(Self(inner))
    }

    /// Creates a new [`App`] around an already connected pool. Used by
    /// the test harness.
    pub fn new_for_tests(pool: Pool) -> Self {
        let config = ripple_config::Config::for_tests();
        let (jwt_encode, jwt_decode) = Self::setup_jwt_keys(&config);

        Self(Arc::new(AppInner {
            config: Arc::new(config),

            primary_db: pool,
            replica_db: None,

            jwt_encode,
            jwt_decode,
        }))
    }

    fn setup_jwt_keys(config: &ripple_config::Config) -> (EncodingKey, DecodingKey) {
        let secret = config.auth.jwt_secret.as_bytes();
        (
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }
}

impl App {
    /// Obtains a read/write transaction from the primary database
    /// pool. Dropping it without an explicit commit rolls back.
    #[tracing::instrument(skip_all, name = "app.db_write")]
    pub async fn db_write(&self) -> std::result::Result<Transaction<'static>, ApiError> {
        trace!("obtaining primary db transaction...");
        self.primary_db.begin().await.map_err(map_pool_error)
    }

    /// Obtains a readonly database connection from the replica
    /// pool or primary pool whichever is possible to obtain.
    ///
    /// The replica pool will be the first to obtain, if not,
    /// then the primary pool will be obtained instead.
    #[tracing::instrument(skip_all, name = "app.db_read")]
    pub async fn db_read(&self) -> std::result::Result<PoolConnection, ApiError> {
        trace!("obtaining replica db connection...");

        let Some(replica_pool) = self.replica_db.as_ref() else {
            return self.primary_db.acquire().await.map_err(map_pool_error);
        };

        match replica_pool.acquire().await {
            Ok(connection) => Ok(connection),
            Err(error) => {
                warn!(%error, "Replica database is not available, falling back to primary");
                self.primary_db.acquire().await.map_err(map_pool_error)
            }
        }
    }
}

/// An unhealthy pool is a service outage, not an internal bug, and
/// clients get the matching 503 instead of a generic 500.
fn map_pool_error(report: error_stack::Report<ripple_db::Error>) -> ApiError {
    use ripple_db::error::ReportExt;

    if report.is_unhealthy() {
        tracing::error!(error = ?report, "Caught outage error");
        ApiError::new(ErrorCategory::Outage)
            .message("Ripple is not available at the moment. Please try again later.")
    } else {
        report.into()
    }
}

impl std::ops::Deref for App {
    type Target = AppInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("primary_db", &self.0.primary_db)
            .field("replica_db", &self.0.replica_db)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::map_pool_error;
    use ripple_error::{ApiError, ErrorCategory};

    #[test]
    fn maps_unhealthy_pools_to_outage() {
        let report = error_stack::Report::new(ripple_db::Error::UnhealthyPool);
        assert_eq!(map_pool_error(report), ApiError::new(ErrorCategory::Outage));
    }

    #[test]
    fn hides_other_pool_errors_behind_unknown() {
        let report = error_stack::Report::new(ripple_db::Error::InvalidUrl);
        assert_eq!(
            map_pool_error(report),
            ApiError::new(ErrorCategory::Unknown)
        );
    }
}
