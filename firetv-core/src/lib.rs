//! Core library for the Fire TV companion services.
//!
//! Everything here is transport-agnostic: the server crate wires these
//! services into HTTP and WebSocket handlers.
#![allow(missing_docs)]

pub mod api;
pub mod cache;
pub mod chapters;
pub mod clock;
pub mod content;
pub mod error;
pub mod normalize;
pub mod party;
pub mod providers;
pub mod roulette;
pub mod trailers;
pub mod watchlist;

pub use cache::{
    CacheEntry, CachePolicy, CacacheSnapshotStore, ContentCache,
    MemorySnapshotStore, SnapshotStore, TrailerCache, TtlCache,
};
pub use chapters::{ChapterClient, ChapterRelayError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use content::ContentService;
pub use error::{CoreError, Result};
pub use party::{PartyError, PartyStore};
pub use providers::ProviderError;
pub use roulette::{RouletteError, RouletteSession, SpinPlan, Wheel};
pub use trailers::{TrailerQuery, TrailerSearch, TrailerService};
pub use watchlist::{WatchListError, WatchListStore};
