use error_stack::{Result, ResultExt};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;

mod database;
mod logging;
mod server;

pub use self::database::Database;
pub use self::logging::{Logging, LoggingStyle};
pub use self::server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ConfigLoadError;

/// The full configuration of a running instance.
///
/// Values are layered in increasing priority: built-in defaults, then
/// the TOML file (`ripple.toml` or whatever `RIPPLE_CONFIG` points
/// to), then `RIPPLE_`-prefixed environment variables with `__` as the
/// section separator (`RIPPLE_DATABASE__URL` and so on).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// Secret used to sign and verify session tokens. There is no
    /// default, an unset secret should abort startup rather than fall
    /// back to something guessable.
    pub jwt_secret: String,
    #[serde(default = "Auth::default_token_expiry_hours")]
    pub token_expiry_hours: u64,
}

impl Auth {
    fn default_token_expiry_hours() -> u64 {
        24 * 2
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default = "Content::default_post_max_characters")]
    pub post_max_characters: usize,
}

impl Content {
    fn default_post_max_characters() -> usize {
        500
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            post_max_characters: Self::default_post_max_characters(),
        }
    }
}

impl Config {
    /// Loads the configuration from the config file (if any) and the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::figment().extract().change_context(ConfigLoadError)
    }

    fn figment() -> Figment {
        let config_file = Env::var("RIPPLE_CONFIG").unwrap_or_else(|| "ripple.toml".to_string());
        Figment::new()
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("RIPPLE_").split("__"))
    }

    /// Configuration for the test suites. The database URL comes from
    /// `RIPPLE_TEST_DATABASE_URL` so tests never touch a real deployment
    /// by accident.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            server: Server::default(),
            database: Database {
                url: std::env::var("RIPPLE_TEST_DATABASE_URL").unwrap_or_default(),
                replica_url: None,
                min_connections: 0,
                max_connections: 5,
                timeout_secs: 5,
                enforce_tls: false,
            },
            auth: Auth {
                jwt_secret: "a-secret-for-tests-and-tests-only".to_string(),
                token_expiry_hours: 1,
            },
            logging: Logging::default(),
            content: Content::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_layered_sources() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "ripple.toml",
                r#"
                    [database]
                    url = "postgres://file/ripple"

                    [auth]
                    jwt_secret = "from-the-file"

                    [content]
                    post_max_characters = 280
                "#,
            )?;
            jail.set_env("RIPPLE_DATABASE__URL", "postgres://env/ripple");
            jail.set_env("RIPPLE_SERVER__PORT", "9999");

            let config = Config::figment().extract::<Config>()?;

            // env beats the file, the file beats defaults
            assert_eq!(config.database.url, "postgres://env/ripple");
            assert_eq!(config.auth.jwt_secret, "from-the-file");
            assert_eq!(config.content.post_max_characters, 280);
            assert_eq!(config.server.port, 9999);
            assert_eq!(
                config.auth.token_expiry_hours,
                Auth::default_token_expiry_hours()
            );
            Ok(())
        });
    }

    #[test]
    fn rejects_missing_jwt_secret() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RIPPLE_DATABASE__URL", "postgres://env/ripple");
            assert!(Config::figment().extract::<Config>().is_err());
            Ok(())
        });
    }
}
