//! Configuration module for pitchboard-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables. Also handles API secret hashing.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{AuthConfig, RuntimeConfig, ServerConfig, StoreSettings};
use pitchboard_core::TtlPolicy;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the API secret if it's plaintext (and rewrite the file)
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;

        let secret_hash = if file_config.is_secret_hashed() {
            file_config.auth.secret.clone()
        } else {
            let hash = hash_secret(&file_config.auth.secret)?;
            file_config.auth.secret = hash.clone();
            self.rewrite_config(&file_config)?;
            tracing::info!("API secret hashed and config file updated");
            hash
        };

        Ok(build_runtime_config(file_config, secret_hash))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<RuntimeConfig, ConfigError> {
        self.load()
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.auth.secret.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.secret must not be empty".to_string(),
        ));
    }
    if config.store.operation_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "store.operation_timeout_ms must be positive".to_string(),
        ));
    }
    if config.store.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "store.sweep_interval_secs must be positive".to_string(),
        ));
    }
    let ttl = &config.ttl;
    if ttl.active_session_secs == 0 || ttl.completed_session_secs == 0 || ttl.analysis_secs == 0 {
        return Err(ConfigError::ValidationError(
            "ttl values must be positive".to_string(),
        ));
    }
    Ok(())
}

fn hash_secret(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

fn build_runtime_config(file_config: FileConfig, secret_hash: String) -> RuntimeConfig {
    let store = file_config.store;
    let ttl = file_config.ttl;
    RuntimeConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        store: StoreSettings {
            backend: store.backend,
            operation_timeout: Duration::from_millis(store.operation_timeout_ms),
            sweep_interval: Duration::from_secs(store.sweep_interval_secs),
            max_connections: store.max_connections,
        },
        ttl: TtlPolicy {
            active_session: Duration::from_secs(ttl.active_session_secs),
            completed_session: Duration::from_secs(ttl.completed_session_secs),
            analysis: Duration::from_secs(ttl.analysis_secs),
        },
        auth: AuthConfig::new(secret_hash),
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
