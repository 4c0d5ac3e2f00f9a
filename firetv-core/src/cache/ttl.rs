use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TTL_HOURS: i64 = 24;
pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: TimeDelta,
    pub max_entries: usize,
}

impl CachePolicy {
    /// `max_entries` is clamped to at least one.
    pub fn new(ttl: TimeDelta, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(TimeDelta::hours(DEFAULT_TTL_HOURS), DEFAULT_MAX_ENTRIES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    pub key: String,
    pub payload: V,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Serialized form of the whole cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<V> {
    pub version: u32,
    pub entries: Vec<CacheEntry<V>>,
}

/// Result of a read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Hit(V),
    Miss,
    /// The entry was present but stale and has been dropped.
    Expired,
}

/// Insertion-ordered map with a fixed TTL and an entry bound.
///
/// Eviction is FIFO by first insertion: reads never reorder entries and
/// overwriting a key keeps its original slot.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    policy: CachePolicy,
    entries: HashMap<String, CacheEntry<V>>,
    order: VecDeque<String>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::with_capacity(policy.max_entries),
            order: VecDeque::with_capacity(policy.max_entries),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the backing map holds `key`, live or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Lookup<V> {
        let Some(entry) = self.entries.get(key) else {
            return Lookup::Miss;
        };
        if entry.is_live(now) {
            return Lookup::Hit(entry.payload.clone());
        }
        self.remove(key);
        Lookup::Expired
    }

    /// Insert or overwrite `key`. Returns the entry evicted to make room, if
    /// any.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        payload: V,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry<V>> {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            payload,
            stored_at: now,
            expires_at: now + self.policy.ttl,
        };

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = entry;
            return None;
        }

        let evicted = if self.entries.len() >= self.policy.max_entries {
            self.evict_oldest()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.insert(key, entry);
        evicted
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry<V>> {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    pub fn snapshot(&self) -> Snapshot<V> {
        Snapshot {
            version: SNAPSHOT_VERSION,
            entries: self.entries().cloned().collect(),
        }
    }

    /// Rebuild from a snapshot, keeping only entries still live at `now`.
    ///
    /// Expiry stamps are kept as persisted. If the snapshot holds more live
    /// entries than the policy allows, the newest ones win.
    pub fn restore(
        policy: CachePolicy,
        snapshot: Snapshot<V>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut cache = Self::new(policy);
        let live: Vec<_> = snapshot
            .entries
            .into_iter()
            .filter(|entry| entry.is_live(now))
            .collect();
        let skip = live.len().saturating_sub(policy.max_entries);

        for entry in live.into_iter().skip(skip) {
            if cache.entries.contains_key(&entry.key) {
                continue;
            }
            cache.order.push_back(entry.key.clone());
            cache.entries.insert(entry.key.clone(), entry);
        }
        cache
    }

    fn evict_oldest(&mut self) -> Option<CacheEntry<V>> {
        let key = self.order.pop_front()?;
        self.entries.remove(&key)
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}
