use error_stack::{Result, ResultExt};
use ripple_config::{Logging, LoggingStyle};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = make_env_filter(rust_log.as_deref().unwrap_or(&config.targets));
    let layer = fmt::layer().with_target(true);

    let registry = tracing_subscriber::Registry::default().with(filter);
    let result = match config.style {
        LoggingStyle::Compact => {
            tracing::subscriber::set_global_default(registry.with(layer.compact()))
        }
        LoggingStyle::Pretty => {
            tracing::subscriber::set_global_default(registry.with(layer.pretty()))
        }
        LoggingStyle::Json => {
            tracing::subscriber::set_global_default(registry.with(layer.json()))
        }
    };
    result
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if rust_log.is_some() {
        warn!("`RUST_LOG` overrides the configured `logging.targets` directives");
    }

    Ok(())
}

/// Installs a test-writer subscriber so `cargo test` captures log
/// output per test. Safe to call from every test, later calls lose
/// the race and are ignored.
pub fn init_for_tests() {
    let filter = make_env_filter(&std::env::var("RUST_LOG").unwrap_or_default());
    let layer = fmt::layer().with_test_writer().compact();

    let registry = tracing_subscriber::Registry::default().with(filter).with(layer);
    let _ = tracing::subscriber::set_global_default(registry);
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
