//! Event-scoped repository over a [`KeyValueStore`].
//!
//! Every record lives under `event:{event_id}:...`. The repository is the
//! only place that builds keys, and it refuses any request whose identifiers
//! or payload would cross an event boundary.

mod key;
mod kind;

pub use key::{kind_prefix, namespace_prefix, record_key};
pub use kind::EntityKind;

use crate::error::{Error, Result};
use crate::store::{Fields, KeyValueStore, record};
use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retention class of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Kept until explicitly deleted.
    Retained,
    /// A session that has not completed yet; expires quickly if abandoned.
    ActiveSession,
    CompletedSession,
    Analysis,
}

/// Expiry durations for each [`TtlClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub active_session: Duration,
    pub completed_session: Duration,
    pub analysis: Duration,
}

impl TtlPolicy {
    pub fn ttl_for(&self, class: TtlClass) -> Option<Duration> {
        match class {
            TtlClass::Retained => None,
            TtlClass::ActiveSession => Some(self.active_session),
            TtlClass::CompletedSession => Some(self.completed_session),
            TtlClass::Analysis => Some(self.analysis),
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            active_session: Duration::from_secs(2 * 60 * 60),
            completed_session: Duration::from_secs(7 * 24 * 60 * 60),
            analysis: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// A typed record stored under an event namespace.
pub trait Entity: Serialize + DeserializeOwned + Send + 'static {
    const KIND: EntityKind;

    /// Kinds stored under the same entity id that are removed together with
    /// this record.
    const OWNED: &'static [EntityKind] = &[];

    /// The event this record belongs to, as recorded inside the payload.
    fn event_id(&self) -> &str;

    fn ttl_class(&self) -> TtlClass {
        TtlClass::Retained
    }
}

/// Client-side filter applied while scanning.
pub type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Lazily fetched records of one kind. Each item is loaded on demand; a
/// record that expires between enumeration and fetch is skipped.
pub type RecordStream<E> = BoxStream<'static, Result<E>>;

/// Handle to the event-scoped keyspace. Cheap to clone.
#[derive(Clone)]
pub struct Keyspace {
    store: Arc<dyn KeyValueStore>,
    ttl: TtlPolicy,
}

impl Keyspace {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: TtlPolicy) -> Self {
        Self { store, ttl }
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Store `record` as `entity_id` under `event_id`, replacing any previous
    /// record at that key in a single write.
    #[tracing::instrument(skip_all, err, name = "Keyspace:put", fields(%event_id, kind = %E::KIND))]
    pub async fn put<E: Entity>(&self, event_id: &str, entity_id: &str, record: &E) -> Result<()> {
        let key = record_key(event_id, E::KIND, entity_id)?;
        if record.event_id() != event_id {
            return Err(Error::ScopeViolation(format!(
                "{} {entity_id} belongs to event {:?}, not {event_id:?}",
                E::KIND,
                record.event_id()
            )));
        }
        let fields = record::encode(record).map_err(|e| Error::MalformedRecord {
            kind: E::KIND,
            key: key.clone(),
            reason: e.to_string(),
        })?;
        let ttl = self.ttl.ttl_for(record.ttl_class());
        self.store.put_record(&key, fields, ttl).await?;
        debug!(%key, ?ttl, "Stored record");
        Ok(())
    }

    /// Fetch one record, failing with `NotFound` when absent or expired.
    pub async fn get<E: Entity>(&self, event_id: &str, entity_id: &str) -> Result<E> {
        self.find(event_id, entity_id)
            .await?
            .ok_or_else(|| Error::not_found(E::KIND, entity_id))
    }

    /// Like [`get`](Self::get) but reports absence as `None`.
    #[tracing::instrument(skip_all, err, name = "Keyspace:find", fields(%event_id, kind = %E::KIND))]
    pub async fn find<E: Entity>(&self, event_id: &str, entity_id: &str) -> Result<Option<E>> {
        let key = record_key(event_id, E::KIND, entity_id)?;
        let Some(fields) = self.store.get_record(&key).await? else {
            return Ok(None);
        };
        decode_owned(event_id, &key, fields).map(Some)
    }

    /// Enumerate every record of kind `E` under `event_id`.
    ///
    /// Ordering is unspecified. The returned stream can be consumed once.
    #[tracing::instrument(skip_all, err, name = "Keyspace:scan", fields(%event_id, kind = %E::KIND))]
    pub async fn scan<E: Entity>(
        &self,
        event_id: &str,
        predicate: Option<Predicate<E>>,
    ) -> Result<RecordStream<E>> {
        let prefix = kind_prefix(event_id, E::KIND)?;
        let keys = self.store.scan_keys(&prefix).await?;
        debug!(%prefix, keys = keys.len(), "Enumerated records");
        Ok(self.fetch_stream(keys, Some(event_id.to_string()), predicate))
    }

    /// Scan and collect into memory in one pass.
    pub async fn scan_all<E: Entity>(
        &self,
        event_id: &str,
        predicate: Option<Predicate<E>>,
    ) -> Result<Vec<E>> {
        self.scan(event_id, predicate).await?.try_collect().await
    }

    /// Enumerate event roots across the whole store.
    ///
    /// This is the only enumeration that is not bounded by one namespace; it
    /// touches root records exclusively.
    #[tracing::instrument(skip_all, err, name = "Keyspace:scan_roots")]
    pub async fn scan_roots<E: Entity>(&self) -> Result<RecordStream<E>> {
        if E::KIND != EntityKind::Event {
            return Err(Error::ScopeViolation(format!(
                "{} records can only be enumerated inside an event",
                E::KIND
            )));
        }
        let keys = self
            .store
            .scan_keys_with_suffix(key::ROOT, key::META_SUFFIX)
            .await?
            .into_iter()
            .filter(|key| key::parse_root_key(key).is_some())
            .collect();
        Ok(self.fetch_stream(keys, None, None))
    }

    /// Remove one record and whatever it owns. Returns whether the record
    /// itself existed.
    #[tracing::instrument(skip_all, err, name = "Keyspace:delete", fields(%event_id, kind = %E::KIND))]
    pub async fn delete<E: Entity>(&self, event_id: &str, entity_id: &str) -> Result<bool> {
        let key = record_key(event_id, E::KIND, entity_id)?;
        let existed = self.store.delete_record(&key).await?;
        for owned in E::OWNED {
            let owned_key = record_key(event_id, *owned, entity_id)?;
            self.store.delete_record(&owned_key).await?;
        }
        debug!(%key, existed, "Deleted record");
        Ok(existed)
    }

    /// Remove every key under `event:{event_id}:`, root first so the event
    /// stops accepting children before they are swept.
    #[tracing::instrument(skip_all, err, name = "Keyspace:delete_namespace", fields(%event_id))]
    pub async fn delete_namespace(&self, event_id: &str) -> Result<u64> {
        let root = record_key(event_id, EntityKind::Event, event_id)?;
        let mut removed = u64::from(self.store.delete_record(&root).await?);
        let prefix = namespace_prefix(event_id)?;
        for key in self.store.scan_keys(&prefix).await? {
            if self.store.delete_record(&key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn fetch_stream<E: Entity>(
        &self,
        keys: Vec<String>,
        owner: Option<String>,
        predicate: Option<Predicate<E>>,
    ) -> RecordStream<E> {
        let store = Arc::clone(&self.store);
        stream::iter(keys)
            .then(move |key| {
                let store = Arc::clone(&store);
                async move {
                    let fetched = store.get_record(&key).await;
                    (key, fetched)
                }
            })
            .filter_map(move |(key, fetched)| {
                let item = match fetched {
                    Err(e) => Some(Err(Error::from(e))),
                    Ok(None) => {
                        debug!(%key, "Record vanished during scan, skipping");
                        None
                    }
                    Ok(Some(fields)) => {
                        let decoded = match owner.as_deref() {
                            Some(owner) => decode_owned::<E>(owner, &key, fields),
                            None => decode_record::<E>(&key, fields),
                        };
                        match decoded {
                            Ok(record) if predicate.as_ref().is_none_or(|keep| keep(&record)) => {
                                Some(Ok(record))
                            }
                            Ok(_) => None,
                            Err(e) => Some(Err(e)),
                        }
                    }
                };
                futures_util::future::ready(item)
            })
            .boxed()
    }
}

fn decode_record<E: Entity>(key: &str, fields: Fields) -> Result<E> {
    record::decode(fields).map_err(|e| Error::MalformedRecord {
        kind: E::KIND,
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode and verify the payload really belongs to `event_id`.
fn decode_owned<E: Entity>(event_id: &str, key: &str, fields: Fields) -> Result<E> {
    let record: E = decode_record(key, fields)?;
    if record.event_id() != event_id {
        warn!(%key, owner = record.event_id(), "Record payload names a foreign event");
        return Err(Error::ScopeViolation(format!(
            "record at {key} belongs to event {:?}",
            record.event_id()
        )));
    }
    Ok(record)
}
