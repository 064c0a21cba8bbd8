//! Application state shared across all request handlers.

use crate::config::runtime::AuthConfig;
use pitchboard_core::Keyspace;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Event-scoped repository over the configured key-value store.
    pub keyspace: Keyspace,
    /// API authentication (can be reloaded via SIGHUP).
    pub auth: Arc<RwLock<AuthConfig>>,
}

impl AppState {
    pub fn new(keyspace: Keyspace, auth: AuthConfig) -> Self {
        Self {
            keyspace,
            auth: Arc::new(RwLock::new(auth)),
        }
    }

    /// Swap the API secret (used during SIGHUP reload).
    pub async fn update_auth(&self, auth: AuthConfig) {
        *self.auth.write().await = auth;
    }
}
