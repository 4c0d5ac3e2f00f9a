//! Bounded TTL cache with a best-effort persistence mirror.
//!
//! [`TtlCache`] is the plain data structure. [`ContentCache`] wraps it with a
//! lock, a [`Clock`](crate::clock::Clock) and an optional [`SnapshotStore`],
//! and is what the rest of the crate holds on to.

mod service;
mod store;
mod ttl;

pub use service::{ContentCache, TrailerCache};
pub use store::{CacacheSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use ttl::{CacheEntry, CachePolicy, Lookup, Snapshot, TtlCache};
