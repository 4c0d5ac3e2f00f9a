use std::{fmt, sync::Arc};

use anyhow::Context;
use firetv_core::{
    CacacheSnapshotStore, ChapterClient, Clock, ContentCache, ContentService,
    PartyStore, SystemClock, TrailerCache, TrailerSearch, TrailerService,
    WatchListStore,
    providers::{OmdbClient, TvMazeClient, WatchmodeClient, YouTubeClient, http_client},
    roulette::RecommendationClient,
};
use firetv_model::ContentItem;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::infra::{
    auth::TokenVerifier, config::Config, websocket::ConnectionManager,
};

const TRAILER_CACHE: &str = "trailers";
const CONTENT_CACHE: &str = "content";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub trailers: Arc<TrailerService>,
    pub content: Arc<ContentService>,
    pub parties: Arc<PartyStore>,
    pub watchlist: Arc<WatchListStore>,
    pub chapters: Arc<ChapterClient>,
    pub recommender: Arc<RecommendationClient>,
    pub websocket_manager: Arc<ConnectionManager>,
    pub tokens: Arc<TokenVerifier>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wire every service from `config` using the wall clock.
    pub async fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn with_clock(
        config: Arc<Config>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let client = http_client(config.upstreams.request_timeout)
            .context("failed to build outbound HTTP client")?;
        let providers = &config.providers;

        let trailer_cache: Arc<TrailerCache> =
            Arc::new(build_cache(&config, TRAILER_CACHE, Arc::clone(&clock)).await?);
        let content_cache: Arc<ContentCache<ContentItem>> =
            Arc::new(build_cache(&config, CONTENT_CACHE, Arc::clone(&clock)).await?);

        let trailer_search = providers
            .youtube_api_key
            .as_ref()
            .map(|key| {
                YouTubeClient::new(client.clone(), &providers.youtube_base_url, key)
            })
            .transpose()
            .context("invalid YouTube base URL")?
            .map(|yt| Arc::new(yt) as Arc<dyn TrailerSearch>);
        let trailers = TrailerService::new(trailer_cache, trailer_search);

        let watchmode = providers
            .watchmode_api_key
            .as_ref()
            .map(|key| {
                WatchmodeClient::new(client.clone(), &providers.watchmode_base_url, key)
            })
            .transpose()
            .context("invalid Watchmode base URL")?;
        let omdb = providers
            .omdb_api_key
            .as_ref()
            .map(|key| OmdbClient::new(client.clone(), &providers.omdb_base_url, key))
            .transpose()
            .context("invalid OMDB base URL")?;
        let tvmaze = TvMazeClient::new(client.clone(), &providers.tvmaze_base_url)
            .context("invalid TVMaze base URL")?;
        let content = ContentService::new(watchmode, tvmaze, omdb, content_cache);

        let chapters =
            ChapterClient::new(client.clone(), &config.upstreams.python_backend_url)
                .context("invalid chapter service URL")?;
        let recommender =
            RecommendationClient::new(client, &config.upstreams.recommender_url)
                .context("invalid recommender URL")?;

        let tokens = TokenVerifier::new(&config.auth.token_secret);
        let parties = PartyStore::new(Arc::clone(&clock));
        let watchlist = WatchListStore::new(Arc::clone(&clock));

        Ok(Self {
            config,
            clock,
            trailers: Arc::new(trailers),
            content: Arc::new(content),
            parties: Arc::new(parties),
            watchlist: Arc::new(watchlist),
            chapters: Arc::new(chapters),
            recommender: Arc::new(recommender),
            websocket_manager: Arc::new(ConnectionManager::new()),
            tokens: Arc::new(tokens),
        })
    }
}

/// Memory-only unless a cache directory is configured, in which case the
/// cache is rehydrated from and mirrored to its `cacache` snapshot.
async fn build_cache<V>(
    config: &Config,
    name: &'static str,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<ContentCache<V>>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let policy = config
        .cache
        .policy()
        .context("cache TTL is out of range")?;

    match &config.cache.dir {
        Some(dir) => {
            info!(cache = name, dir = %dir.display(), "Persisting cache snapshots");
            let store = Arc::new(CacacheSnapshotStore::new(dir.clone(), name));
            Ok(ContentCache::load(name, policy, clock, store).await)
        }
        None => Ok(ContentCache::new(name, policy, clock)),
    }
}
