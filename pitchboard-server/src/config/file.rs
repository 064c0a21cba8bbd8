//! TOML file configuration structures.
//!
//! These structs directly map to the `pitchboard.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ttl: TtlConfig,
    pub auth: AuthConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-process map. Data is lost on restart.
    Memory,
    /// PostgreSQL, connection string taken from `DATABASE_URL`.
    Postgres,
}

/// Key-value store section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Upper bound for a single store call before it fails as unavailable.
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
    /// How often expired records are physically removed.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            operation_timeout_ms: default_operation_timeout_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Postgres
}

fn default_operation_timeout_ms() -> u64 {
    2_000
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_max_connections() -> u32 {
    10
}

/// Record expiry section, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlConfig {
    #[serde(default = "default_active_session_secs")]
    pub active_session_secs: u64,
    #[serde(default = "default_retention_secs")]
    pub completed_session_secs: u64,
    #[serde(default = "default_retention_secs")]
    pub analysis_secs: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            active_session_secs: default_active_session_secs(),
            completed_session_secs: default_retention_secs(),
            analysis_secs: default_retention_secs(),
        }
    }
}

fn default_active_session_secs() -> u64 {
    2 * 60 * 60
}

fn default_retention_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// Authentication section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The API secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

impl FileConfig {
    /// Check if the API secret is already hashed (argon2 format).
    pub fn is_secret_hashed(&self) -> bool {
        self.auth.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[store]
backend = "memory"
operation_timeout_ms = 500
sweep_interval_secs = 30

[ttl]
active_session_secs = 600

[auth]
secret = "test-secret"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.operation_timeout_ms, 500);
        assert_eq!(config.store.max_connections, 10);
        assert_eq!(config.ttl.active_session_secs, 600);
        assert_eq!(config.ttl.completed_session_secs, 7 * 24 * 60 * 60);
        assert!(!config.is_secret_hashed());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FileConfig = toml::from_str("[auth]\nsecret = \"s\"\n").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.ttl.active_session_secs, 7200);
    }

    #[test]
    fn test_hashed_secret_detection() {
        let config: FileConfig = toml::from_str(
            "[auth]\nsecret = \"$argon2id$v=19$m=19456,t=2,p=1$abc123\"\n",
        )
        .unwrap();
        assert!(config.is_secret_hashed());
    }

    #[test]
    fn test_auth_section_is_required() {
        assert!(toml::from_str::<FileConfig>("[server]\nlisten = \"127.0.0.1:1\"\n").is_err());
    }
}
