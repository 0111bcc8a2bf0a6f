use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Filter directives in `tracing_subscriber::EnvFilter` syntax.
    #[serde(default = "Logging::default_targets")]
    pub targets: String,

    #[serde(default)]
    pub style: LoggingStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl Logging {
    fn default_targets() -> String {
        "info".to_string()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            targets: Self::default_targets(),
            style: LoggingStyle::default(),
        }
    }
}
