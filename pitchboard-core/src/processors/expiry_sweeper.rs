//! ExpirySweeper processor.
//!
//! Expired records already read as absent; the sweeper only reclaims their
//! storage. It runs on a fixed interval and never touches request paths.

use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

pub struct ExpirySweeper {
    store: Arc<dyn KeyValueStore>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn KeyValueStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Purge once. Returns the number of records removed.
    pub async fn sweep(&self) -> u64 {
        match self.store.purge_expired().await {
            Ok(0) => 0,
            Ok(purged) => {
                debug!(purged, "Purged expired records");
                purged
            }
            Err(e) => {
                error!(error = %e, "Failed to purge expired records");
                0
            }
        }
    }

    /// Run until shutdown is signaled.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "ExpirySweeper started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("ExpirySweeper received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }

        info!("ExpirySweeper shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fields, MemoryStore};

    #[tokio::test(start_paused = true)]
    async fn test_sweep_reclaims_expired_records() {
        let store = Arc::new(MemoryStore::new());
        store
            .put_record("event:e:session:s1", Fields::new(), Some(Duration::from_secs(5)))
            .await
            .ok();
        store
            .put_record("event:e:meta", Fields::new(), None)
            .await
            .ok();
        let sweeper = ExpirySweeper::new(store.clone(), Duration::from_secs(60));

        assert_eq!(sweeper.sweep().await, 0);
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(sweeper.sweep().await, 1);
        assert_eq!(store.raw_len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let sweeper = ExpirySweeper::new(Arc::new(MemoryStore::new()), Duration::from_secs(1));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(sweeper.run(rx));
        tokio::time::advance(Duration::from_secs(3)).await;
        tx.send(true).ok();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_survives_offline_store() {
        let store = Arc::new(MemoryStore::new());
        store.set_online(false);
        let sweeper = ExpirySweeper::new(store, Duration::from_secs(1));
        assert_eq!(sweeper.sweep().await, 0);
    }
}
