//! Trailer lookup in front of the trailer cache.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use firetv_model::{TrailerKey, TrailerPayload};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    cache::TrailerCache,
    providers::{ProviderError, YouTubeClient},
};

/// Stand-in trailers served when no video search key is configured.
pub const PLACEHOLDER_TRAILERS: [(&str, &str); 5] = [
    ("EXeTwQWrcwY", "The Dark Knight"),
    ("TcMBFSGVi1c", "Avengers: Endgame"),
    ("sGbxmsDFVnE", "Inception"),
    ("QdBZY2fkU-0", "Joker"),
    ("hA6hldpSTF8", "Interstellar"),
];

/// Video search seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrailerSearch: Send + Sync {
    async fn search_first(
        &self,
        query: &str,
    ) -> Result<Option<TrailerPayload>, ProviderError>;
}

#[async_trait]
impl TrailerSearch for YouTubeClient {
    async fn search_first(
        &self,
        query: &str,
    ) -> Result<Option<TrailerPayload>, ProviderError> {
        self.search_first_video(query).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrailerQuery {
    pub title: String,
    /// Release year, used for the key when no episode is given.
    pub year: Option<i32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl TrailerQuery {
    pub fn for_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn for_release(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn for_episode(title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            title: title.into(),
            season: Some(season),
            episode: Some(episode),
            ..Self::default()
        }
    }

    pub fn cache_key(&self) -> TrailerKey {
        match (self.episode(), self.year) {
            (None, Some(year)) => TrailerKey::for_title(&self.title, year),
            _ => TrailerKey::for_episode(&self.title, self.season, self.episode),
        }
    }

    fn episode(&self) -> Option<(u32, u32)> {
        self.season.zip(self.episode)
    }

    /// Query string handed to the video search.
    pub fn search_terms(&self) -> String {
        match (self.episode(), self.year) {
            (Some((s, e)), _) => {
                format!("{} season {s} episode {e} trailer", self.title)
            }
            (None, Some(year)) => format!("{} {year} trailer", self.title),
            (None, None) => format!("{} trailer", self.title),
        }
    }

    fn placeholder_title(&self) -> String {
        match self.episode() {
            Some((s, e)) => format!("{} S{s}E{e}", self.title),
            None => format!("{} - Official Trailer", self.title),
        }
    }
}

pub struct TrailerService {
    cache: Arc<TrailerCache>,
    search: Option<Arc<dyn TrailerSearch>>,
}

impl fmt::Debug for TrailerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrailerService")
            .field("cache", &self.cache)
            .field("search_enabled", &self.search.is_some())
            .finish()
    }
}

impl TrailerService {
    /// Without a search backend every lookup resolves to a placeholder.
    pub fn new(
        cache: Arc<TrailerCache>,
        search: Option<Arc<dyn TrailerSearch>>,
    ) -> Self {
        Self { cache, search }
    }

    pub fn cache(&self) -> &Arc<TrailerCache> {
        &self.cache
    }

    /// Cached trailer, else a fresh search. `None` means no trailer is
    /// available; provider failures are logged and end up here too.
    pub async fn find(&self, query: &TrailerQuery) -> Option<TrailerPayload> {
        let title = query.title.trim();
        if title.is_empty() {
            return None;
        }
        let key = query.cache_key();
        if let Some(hit) = self.cache.get(key.as_str()).await {
            return Some(hit);
        }

        let Some(search) = &self.search else {
            let trailer = placeholder_trailer(query, &mut rand::rng());
            debug!("No video search configured, using placeholder for {}", key);
            self.cache.put(key.into_inner(), trailer.clone()).await;
            return Some(trailer);
        };

        let terms = query.search_terms();
        match search.search_first(&terms).await {
            Ok(Some(trailer)) => {
                info!("Resolved trailer {} for {}", trailer.video_id, key);
                self.cache.put(key.into_inner(), trailer.clone()).await;
                Some(trailer)
            }
            Ok(None) => {
                debug!("No trailer found for query: {}", terms);
                None
            }
            Err(e) => {
                warn!("Trailer search failed for {}: {}", key, e);
                None
            }
        }
    }
}

pub fn placeholder_trailer<R: Rng>(
    query: &TrailerQuery,
    rng: &mut R,
) -> TrailerPayload {
    let index = rng.random_range(0..PLACEHOLDER_TRAILERS.len());
    let (video_id, _) = PLACEHOLDER_TRAILERS[index];
    TrailerPayload::new(
        video_id,
        query.placeholder_title(),
        TrailerPayload::default_thumbnail(video_id),
    )
}
