//! In-process store used by tests and single-node development setups.

use super::{Fields, KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct MemoryEntry {
    fields: Fields,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Ordered in-memory map with lazy expiry.
///
/// Expiry uses `tokio::time::Instant`, so a paused test clock controls it.
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, MemoryEntry>>,
    online: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the connection to the store.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Number of physically held records, expired ones included.
    pub async fn raw_len(&self) -> usize {
        self.records.read().await.len()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(StoreError::Offline("memory store is offline".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put_record(
        &self,
        key: &str,
        fields: Fields,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.records
            .write()
            .await
            .insert(key.to_string(), MemoryEntry { fields, expires_at });
        Ok(())
    }

    async fn get_record(&self, key: &str) -> Result<Option<Fields>, StoreError> {
        self.ensure_online()?;
        let now = Instant::now();
        let records = self.records.read().await;
        Ok(records
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.fields.clone()))
    }

    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.ensure_online()?;
        let now = Instant::now();
        let records = self.records.read().await;
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn scan_keys_with_suffix(
        &self,
        prefix: &str,
        suffix: &str,
    ) -> Result<Vec<String>, StoreError> {
        self.ensure_online()?;
        let now = Instant::now();
        let records = self.records.read().await;
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(key, entry)| {
                key.len() >= prefix.len() + suffix.len()
                    && key.ends_with(suffix)
                    && entry.is_live(now)
            })
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_record(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let now = Instant::now();
        let removed = self.records.write().await.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live(now)))
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let now = Instant::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, entry| entry.is_live(now));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(value: &str) -> Fields {
        Fields::from([("v".to_string(), value.to_string())])
    }

    #[tokio::test]
    async fn test_put_replaces_whole_record() {
        let store = MemoryStore::new();
        let mut first = fields("1");
        first.insert("extra".to_string(), "x".to_string());
        store.put_record("k", first, None).await.unwrap();
        store.put_record("k", fields("2"), None).await.unwrap();
        assert_eq!(store.get_record("k").await.unwrap(), Some(fields("2")));
    }

    #[tokio::test]
    async fn test_scan_is_prefix_bounded() {
        let store = MemoryStore::new();
        for key in ["event:a:session:1", "event:a:session:2", "event:ab:session:1", "event:b:x"] {
            store.put_record(key, fields(key), None).await.unwrap();
        }
        let keys = store.scan_keys("event:a:").await.unwrap();
        assert_eq!(keys, vec!["event:a:session:1", "event:a:session:2"]);
    }

    #[tokio::test]
    async fn test_suffix_scan_skips_owned_records() {
        let store = MemoryStore::new();
        for key in [
            "event:a:meta",
            "event:a:session:meta",
            "event:a:session:s1",
            "event:b:meta",
            "event:meta",
            "other:c:meta",
        ] {
            store.put_record(key, fields(key), None).await.unwrap();
        }
        let keys = store.scan_keys_with_suffix("event:", ":meta").await.unwrap();
        assert_eq!(keys, vec!["event:a:meta", "event:a:session:meta", "event:b:meta"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_records_disappear() {
        let store = MemoryStore::new();
        store
            .put_record("short", fields("s"), Some(Duration::from_secs(10)))
            .await
            .unwrap();
        store.put_record("forever", fields("f"), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(store.get_record("short").await.unwrap(), None);
        assert_eq!(store.scan_keys("").await.unwrap(), vec!["forever"]);
        assert_eq!(store.raw_len().await, 2);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.raw_len().await, 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_online(false);
        assert!(matches!(
            store.get_record("k").await,
            Err(StoreError::Offline(_))
        ));
        store.set_online(true);
        assert!(store.get_record("k").await.unwrap().is_none());
    }
}
