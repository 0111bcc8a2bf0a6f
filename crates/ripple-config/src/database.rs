use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// Connection URL of the primary (read-write) database.
    pub url: String,

    /// Optional read-only replica. Read paths fall back to the
    /// primary when this is unset or the replica is unhealthy.
    #[serde(default)]
    pub replica_url: Option<String>,

    #[serde(default)]
    pub min_connections: u32,

    #[serde(default = "Database::default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a connection before giving up.
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Refuse to connect without TLS. Off by default so local
    /// development against a plain socket keeps working.
    #[serde(default)]
    pub enforce_tls: bool,
}

impl Database {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
