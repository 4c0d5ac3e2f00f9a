//! Catalog search and detail enrichment across the metadata providers.

use std::sync::Arc;

use firetv_model::{ContentItem, ContentKind};
use tracing::{debug, warn};

use crate::{
    cache::ContentCache,
    normalize::{
        best_tvmaze_match, enrich_with_omdb, enrich_with_tvmaze, from_watchmode,
        merge_watchmode_details,
    },
    providers::{
        OmdbClient, ProviderError, TvMazeClient, TvMazeSeason, TvMazeShow,
        WatchmodeClient, omdb::OmdbLookup,
    },
};

#[derive(Debug)]
pub struct ContentService {
    watchmode: Option<WatchmodeClient>,
    tvmaze: TvMazeClient,
    omdb: Option<OmdbClient>,
    enriched: Arc<ContentCache<ContentItem>>,
}

impl ContentService {
    pub fn new(
        watchmode: Option<WatchmodeClient>,
        tvmaze: TvMazeClient,
        omdb: Option<OmdbClient>,
        enriched: Arc<ContentCache<ContentItem>>,
    ) -> Self {
        Self {
            watchmode,
            tvmaze,
            omdb,
            enriched,
        }
    }

    /// Normalized Watchmode search results.
    pub async fn search(
        &self,
        query: &str,
    ) -> Result<Vec<ContentItem>, ProviderError> {
        let watchmode = self
            .watchmode
            .as_ref()
            .ok_or(ProviderError::MissingApiKey("Watchmode"))?;
        let results = watchmode.search(query).await?;
        Ok(results.iter().map(from_watchmode).collect())
    }

    /// Listing item merged with its Watchmode details page.
    pub async fn details(
        &self,
        item: ContentItem,
    ) -> Result<ContentItem, ProviderError> {
        let watchmode = self
            .watchmode
            .as_ref()
            .ok_or(ProviderError::MissingApiKey("Watchmode"))?;
        let id: u64 = item
            .id
            .parse()
            .map_err(|_| ProviderError::ParseError(format!("not a Watchmode id: {}", item.id)))?;
        let details = watchmode.title_details(id).await?;
        Ok(merge_watchmode_details(item, &details))
    }

    /// Fill whatever a detail view still lacks. Provider failures leave the
    /// item as it was.
    pub async fn enrich(&self, item: ContentItem) -> ContentItem {
        if !item.needs_enrichment() {
            return item;
        }
        let key = enrichment_key(&item);
        if let Some(hit) = self.enriched.get(&key).await {
            return hit;
        }

        let enriched = if item.kind.is_movie() {
            self.enrich_movie(item).await
        } else {
            self.enrich_show(item).await
        };
        self.enriched.put(key, enriched.clone()).await;
        enriched
    }

    async fn enrich_movie(&self, item: ContentItem) -> ContentItem {
        let mut item = match self.find_movie_show(&item).await {
            Ok(Some(show)) => enrich_with_tvmaze(item, &show, &[]),
            Ok(None) => item,
            Err(e) => {
                warn!("TVMaze enrichment failed for {}: {}", item.title, e);
                item
            }
        };

        if let Some(omdb) = &self.omdb {
            let lookup = match item.imdb_id.as_deref() {
                Some(imdb) => OmdbLookup::ImdbId(imdb),
                None => OmdbLookup::Title(&item.title),
            };
            match omdb.fetch(lookup).await {
                Ok(record) => item = enrich_with_omdb(item, &record),
                Err(ProviderError::NotFound) => {
                    debug!("OMDB has no record for {}", item.title);
                }
                Err(e) => warn!("OMDB enrichment failed for {}: {}", item.title, e),
            }
        }
        item
    }

    async fn enrich_show(&self, item: ContentItem) -> ContentItem {
        let show = match self.find_show(&item).await {
            Ok(Some(show)) => show,
            Ok(None) => return item,
            Err(e) => {
                warn!("TVMaze enrichment failed for {}: {}", item.title, e);
                return item;
            }
        };

        let seasons: Vec<TvMazeSeason> = match self.tvmaze.seasons(show.id).await {
            Ok(seasons) => seasons,
            Err(e) => {
                warn!("Failed to fetch seasons for show {}: {}", show.id, e);
                Vec::new()
            }
        };
        enrich_with_tvmaze(item, &show, &seasons)
    }

    async fn lookup_imdb(
        &self,
        item: &ContentItem,
    ) -> Result<Option<TvMazeShow>, ProviderError> {
        match item.imdb_id.as_deref() {
            Some(imdb) => self.tvmaze.lookup_by_imdb(imdb).await,
            None => Ok(None),
        }
    }

    /// Movies only match scripted shows whose name contains the title.
    async fn find_movie_show(
        &self,
        item: &ContentItem,
    ) -> Result<Option<TvMazeShow>, ProviderError> {
        if let Some(show) = self.lookup_imdb(item).await? {
            return Ok(Some(show));
        }
        let needle = item.title.to_lowercase();
        let results = self.tvmaze.search_shows(&item.title).await?;
        Ok(results.into_iter().map(|r| r.show).find(|show| {
            show.kind.as_deref() == Some("Scripted")
                && show.name.to_lowercase().contains(&needle)
        }))
    }

    /// Exact name match, else the closest premiere year, else the first hit.
    async fn find_show(
        &self,
        item: &ContentItem,
    ) -> Result<Option<TvMazeShow>, ProviderError> {
        if let Some(show) = self.lookup_imdb(item).await? {
            return Ok(Some(show));
        }
        let shows: Vec<TvMazeShow> = self
            .tvmaze
            .search_shows(&item.title)
            .await?
            .into_iter()
            .map(|r| r.show)
            .collect();

        if let Some(exact) = shows
            .iter()
            .find(|show| show.name.eq_ignore_ascii_case(&item.title))
        {
            return Ok(Some(exact.clone()));
        }
        Ok(best_tvmaze_match(&shows, item.year).cloned())
    }
}

fn enrichment_key(item: &ContentItem) -> String {
    let kind = match item.kind {
        ContentKind::Movie => "movie",
        _ => "show",
    };
    match item.imdb_id.as_deref() {
        Some(imdb) => format!("{kind}:{imdb}"),
        None => format!("{kind}:{}", item.cache_key()),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
    };
    use chrono::TimeDelta;
    use serde_json::json;
    use std::collections::HashMap;

    use super::*;
    use crate::{
        cache::CachePolicy,
        clock::ManualClock,
        providers::{DEFAULT_REQUEST_TIMEOUT, http_client, test_support},
    };

    fn tvmaze_router() -> Router {
        Router::new()
            .route(
                "/lookup/shows",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/search/shows",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let q = q.get("q").cloned().unwrap_or_default();
                    Json(json!([
                        {"score": 0.9, "show": {
                            "id": 1, "name": format!("{q} Redux"), "type": "Reality",
                            "premiered": "2001-01-01"
                        }},
                        {"score": 0.8, "show": {
                            "id": 2, "name": q, "type": "Scripted",
                            "premiered": "2017-12-01",
                            "status": "Ended",
                            "genres": ["Drama", "Mystery"],
                            "network": null,
                            "webChannel": {"id": 1, "name": "Netflix"},
                            "summary": "<p>Time travel</p>",
                            "image": {"medium": "m.jpg", "original": "o.jpg"},
                            "runtime": 60
                        }}
                    ]))
                }),
            )
            .route(
                "/shows/{id}/seasons",
                get(|Path(id): Path<u64>| async move {
                    assert_eq!(id, 2);
                    Json(json!([
                        {"id": 1, "number": 1, "episodeOrder": 10},
                        {"id": 2, "number": 2, "episodeOrder": 8},
                        {"id": 3, "number": 3, "episodeOrder": 8}
                    ]))
                }),
            )
    }

    fn omdb_router() -> Router {
        Router::new().route(
            "/",
            get(|| async {
                Json(json!({
                    "Title": "Dark",
                    "Director": "Christopher Nolan",
                    "Actors": "Heath Ledger, Christian Bale",
                    "Runtime": "152 min",
                    "Poster": "omdb.jpg",
                    "Response": "True"
                }))
            }),
        )
    }

    async fn service(with_omdb: bool) -> ContentService {
        let http = http_client(DEFAULT_REQUEST_TIMEOUT).unwrap();
        let tvmaze =
            TvMazeClient::new(http.clone(), &test_support::serve(tvmaze_router()).await)
                .unwrap();
        let omdb = if with_omdb {
            Some(
                OmdbClient::new(
                    http.clone(),
                    &test_support::serve(omdb_router()).await,
                    "k",
                )
                .unwrap(),
            )
        } else {
            None
        };
        let cache = Arc::new(ContentCache::new(
            "enriched",
            CachePolicy::new(TimeDelta::hours(1), 10),
            Arc::new(ManualClock::at_epoch()),
        ));
        ContentService::new(None, tvmaze, omdb, cache)
    }

    #[tokio::test]
    async fn shows_prefer_exact_name_and_count_seasons() {
        let service = service(false).await;
        let item = ContentItem::new("10", "Dark", ContentKind::TvSeries);

        let enriched = service.enrich(item).await;
        assert_eq!(enriched.tvmaze_id, Some(2));
        assert_eq!(enriched.network_names, ["Netflix"]);
        assert_eq!(enriched.plot.as_deref(), Some("Time travel"));
        assert_eq!(enriched.season_count, Some(3));
        assert_eq!(enriched.episode_count, Some(26));
        assert_eq!(enriched.poster.as_deref(), Some("o.jpg"));
    }

    #[tokio::test]
    async fn movies_take_tvmaze_before_omdb() {
        let service = service(true).await;
        let item = ContentItem::new("11", "Dark", ContentKind::Movie);

        let enriched = service.enrich(item).await;
        assert_eq!(enriched.poster.as_deref(), Some("o.jpg"));
        assert_eq!(enriched.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(enriched.cast.len(), 2);
        assert_eq!(enriched.runtime_minutes, Some(60));
        assert_eq!(enriched.season_count, None);
    }

    #[tokio::test]
    async fn complete_items_are_returned_as_is() {
        let service = service(true).await;
        let mut item = ContentItem::new("12", "Done", ContentKind::Movie);
        item.poster = Some("p".into());
        item.plot = Some("p".into());
        item.genres = vec!["g".into()];
        item.runtime_minutes = Some(1);
        item.director = Some("d".into());
        item.cast = vec!["c".into()];
        assert_eq!(service.enrich(item.clone()).await, item);
    }

    #[tokio::test]
    async fn search_without_key_is_an_error() {
        let service = service(false).await;
        assert!(matches!(
            service.search("anything").await,
            Err(ProviderError::MissingApiKey("Watchmode"))
        ));
    }
}
