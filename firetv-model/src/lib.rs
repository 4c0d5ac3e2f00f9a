//! Core data model definitions shared across the Fire TV companion crates.
#![allow(missing_docs)]

pub mod chapters;
pub mod content;
pub mod error;
pub mod party;
pub mod roulette;
pub mod socket;
pub mod trailer;
pub mod watchlist;

// Intentionally curated re-exports for downstream consumers.
pub use chapters::{ChapterRequest, ChapterRelayFailure, ChapterRelaySuccess};
pub use content::{ContentItem, ContentKind, Schedule};
pub use error::{ModelError, Result as ModelResult};
pub use party::{
    ChatMessage, CreatePartyRequest, JoinPartyRequest, Party, PartyCreator,
    PartyId, PartyMember,
};
pub use roulette::{RecommendationInput, RouletteMode, SpinRequest, SpinResponse};
pub use socket::{ClientEvent, ServerEvent};
pub use trailer::{TrailerKey, TrailerPayload};
pub use watchlist::{
    AddWatchListRequest, GenreInput, LabelCount, NewWatchListItem, Pagination,
    PriorityCount, RemovedWatchListItem, SortOrder, UpdateWatchListRequest,
    WatchListItem, WatchListOverview, WatchListPage, WatchListQuery,
    WatchListSort, WatchListStatistics,
};
