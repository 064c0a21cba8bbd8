//! Validated runtime configuration.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use pitchboard_core::TtlPolicy;
use std::net::SocketAddr;
use std::time::Duration;

pub use super::file::StoreBackend;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub operation_timeout: Duration,
    pub sweep_interval: Duration,
    pub max_connections: u32,
}

/// API authentication with a hashed secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The argon2 hashed API secret.
    pub secret_hash: String,
}

impl AuthConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Verify a plaintext key against the stored hash.
    pub fn verify_secret(&self, plaintext: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.secret_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Everything the server needs after loading.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub store: StoreSettings,
    pub ttl: TtlPolicy,
    pub auth: AuthConfig,
}
