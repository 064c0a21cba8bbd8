//! Key-value store substrate.
//!
//! Records are flat hashes (`field -> string`) addressed by string keys,
//! with optional per-record expiry and prefix enumeration. The keyspace
//! repository is the only caller; it never talks to a backend directly.

mod memory;
mod postgres;
pub mod record;

pub use memory::MemoryStore;
pub use postgres::PgKeyValueStore;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// A stored hash record.
pub type Fields = BTreeMap<String, String>;

/// Errors raised by a store backend.
///
/// All of them mean the store could not serve the request; none is retried
/// inside this crate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The operation did not finish within the configured timeout
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The backend refused the connection
    #[error("store offline: {0}")]
    Offline(String),
}

impl From<sqlx::Error> for StoreError {
    /// Connection-level failures mean the backend is unreachable; everything
    /// else is reported as a database error.
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Offline(value.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Operations the keyspace repository needs from a networked key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically replace the hash at `key`.
    ///
    /// `ttl = None` clears any previous expiry.
    async fn put_record(
        &self,
        key: &str,
        fields: Fields,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;

    /// Fetch the hash at `key`. Expired records are reported as absent.
    async fn get_record(&self, key: &str) -> Result<Option<Fields>, StoreError>;

    /// List the live keys starting with `prefix`.
    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// List the live keys starting with `prefix` and ending with `suffix`.
    async fn scan_keys_with_suffix(
        &self,
        prefix: &str,
        suffix: &str,
    ) -> Result<Vec<String>, StoreError>;

    /// Remove the record at `key`, returning whether one existed.
    async fn delete_record(&self, key: &str) -> Result<bool, StoreError>;

    /// Physically drop expired records, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}
