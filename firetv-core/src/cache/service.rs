use std::{fmt, sync::Arc};

use firetv_model::TrailerPayload;
use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use super::{
    store::SnapshotStore,
    ttl::{CachePolicy, Lookup, Snapshot, TtlCache},
};
use crate::clock::Clock;

/// Cache of resolved trailers keyed by [`firetv_model::TrailerKey`].
pub type TrailerCache = ContentCache<TrailerPayload>;

/// Shared, clock-driven TTL cache with an optional snapshot mirror.
///
/// The in-memory map is the source of truth. After every mutation the whole
/// entry set is written to the snapshot store; failures there are logged and
/// otherwise ignored.
pub struct ContentCache<V> {
    name: &'static str,
    inner: Mutex<TtlCache<V>>,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn SnapshotStore>>,
    // Serializes snapshot writes so the last write always carries the
    // newest state.
    persist: tokio::sync::Mutex<()>,
}

impl<V> fmt::Debug for ContentCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache")
            .field("name", &self.name)
            .field("clock", &self.clock)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<V> ContentCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Memory-only cache.
    pub fn new(
        name: &'static str,
        policy: CachePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            inner: Mutex::new(TtlCache::new(policy)),
            clock,
            store: None,
            persist: tokio::sync::Mutex::new(()),
        }
    }

    /// Cache mirrored to `store`, rehydrated from whatever it already holds.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty cache.
    pub async fn load(
        name: &'static str,
        policy: CachePolicy,
        clock: Arc<dyn Clock>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let cache = match store.load().await {
            Ok(Some(bytes)) => {
                match serde_json::from_slice::<Snapshot<V>>(&bytes) {
                    Ok(snapshot) => {
                        let restored =
                            TtlCache::restore(policy, snapshot, clock.now());
                        info!(
                            cache = name,
                            entries = restored.len(),
                            "Restored cache snapshot"
                        );
                        restored
                    }
                    Err(e) => {
                        warn!(cache = name, "Discarding unreadable snapshot: {}", e);
                        TtlCache::new(policy)
                    }
                }
            }
            Ok(None) => {
                debug!(cache = name, "No cache snapshot found");
                TtlCache::new(policy)
            }
            Err(e) => {
                warn!(cache = name, "Failed to load cache snapshot: {}", e);
                TtlCache::new(policy)
            }
        };

        Self {
            name,
            inner: Mutex::new(cache),
            clock,
            store: Some(store),
            persist: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let lookup = {
            let mut inner = self.inner.lock();
            inner.get(key, self.clock.now())
        };

        match lookup {
            Lookup::Hit(value) => {
                debug!(cache = self.name, "Cache HIT for key: {}", key);
                Some(value)
            }
            Lookup::Miss => {
                debug!(cache = self.name, "Cache MISS for key: {}", key);
                None
            }
            Lookup::Expired => {
                debug!(cache = self.name, "Cache entry expired for key: {}", key);
                self.persist().await;
                None
            }
        }
    }

    pub async fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let evicted = {
            let mut inner = self.inner.lock();
            inner.put(key.clone(), value, self.clock.now())
        };
        if let Some(evicted) = evicted {
            debug!(
                cache = self.name,
                "Evicted oldest entry {} to make room for {}", evicted.key, key
            );
        }
        self.persist().await;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Whether the backing map still holds `key`, without expiring it.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().contains_key(key)
    }

    pub fn policy(&self) -> CachePolicy {
        self.inner.lock().policy()
    }

    async fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let _guard = self.persist.lock().await;

        let encoded = {
            let inner = self.inner.lock();
            serde_json::to_vec(&inner.snapshot())
        };
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(cache = self.name, "Failed to encode cache snapshot: {}", e);
                return;
            }
        };

        if let Err(e) = store.save(&bytes).await {
            warn!(cache = self.name, "Failed to persist cache snapshot: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::{
        cache::{CacacheSnapshotStore, MemorySnapshotStore},
        clock::ManualClock,
    };

    fn payload(id: &str) -> TrailerPayload {
        TrailerPayload::new(id, format!("{id} trailer"), "thumb.jpg")
    }

    fn policy(max: usize) -> CachePolicy {
        CachePolicy::new(TimeDelta::hours(24), max)
    }

    #[tokio::test]
    async fn expiry_follows_the_injected_clock() {
        let clock = Arc::new(ManualClock::at_epoch());
        let cache = TrailerCache::new("trailers", policy(2), clock.clone());

        cache.put("A", payload("a")).await;
        clock.advance(TimeDelta::seconds(1));
        cache.put("B", payload("b")).await;
        clock.advance(TimeDelta::seconds(1));
        cache.put("C", payload("c")).await;

        assert!(!cache.contains_key("A"));
        assert_eq!(cache.get("C").await, Some(payload("c")));

        clock.set(chrono::DateTime::UNIX_EPOCH + TimeDelta::hours(24) + TimeDelta::seconds(1));
        assert_eq!(cache.get("B").await, None);
        assert!(!cache.contains_key("B"));
    }

    #[tokio::test]
    async fn every_mutation_is_mirrored() {
        let clock = Arc::new(ManualClock::at_epoch());
        let store = Arc::new(MemorySnapshotStore::new());
        let cache =
            TrailerCache::load("trailers", policy(10), clock.clone(), store.clone())
                .await;

        cache.put("A", payload("a")).await;
        let blob = store.contents().unwrap();
        let snapshot: Snapshot<TrailerPayload> =
            serde_json::from_slice(&blob).unwrap();
        assert_eq!(snapshot.entries.len(), 1);

        clock.advance(TimeDelta::hours(25));
        assert_eq!(cache.get("A").await, None);
        let snapshot: Snapshot<TrailerPayload> =
            serde_json::from_slice(&store.contents().unwrap()).unwrap();
        assert!(snapshot.entries.is_empty());
    }

    #[tokio::test]
    async fn reload_keeps_non_expired_entries() {
        let clock = Arc::new(ManualClock::at_epoch());
        let store = Arc::new(MemorySnapshotStore::new());
        let cache =
            TrailerCache::load("trailers", policy(10), clock.clone(), store.clone())
                .await;
        cache.put("old", payload("old")).await;
        clock.advance(TimeDelta::hours(12));
        cache.put("fresh", payload("fresh")).await;
        drop(cache);

        clock.advance(TimeDelta::hours(13));
        let reloaded =
            TrailerCache::load("trailers", policy(10), clock.clone(), store)
                .await;
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("fresh").await, Some(payload("fresh")));
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_empty_cache() {
        let clock = Arc::new(ManualClock::at_epoch());
        let store = Arc::new(MemorySnapshotStore::with_blob(b"{not json".to_vec()));
        let cache =
            TrailerCache::load("trailers", policy(10), clock, store).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn failing_store_does_not_affect_reads() {
        let clock = Arc::new(ManualClock::at_epoch());
        let store = Arc::new(MemorySnapshotStore::read_only());
        let cache =
            TrailerCache::load("trailers", policy(10), clock, store).await;

        cache.put("A", payload("a")).await;
        assert_eq!(cache.get("A").await, Some(payload("a")));
    }

    #[tokio::test]
    async fn survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::at_epoch());
        let store = Arc::new(CacacheSnapshotStore::new(
            dir.path(),
            "trailers/v1/snapshot",
        ));

        {
            let cache = TrailerCache::load(
                "trailers",
                policy(10),
                clock.clone(),
                store.clone(),
            )
            .await;
            cache.put("Dark-series-trailer", payload("dark")).await;
        }

        let reopened =
            TrailerCache::load("trailers", policy(10), clock, store).await;
        assert_eq!(
            reopened.get("Dark-series-trailer").await,
            Some(payload("dark"))
        );
    }
}
