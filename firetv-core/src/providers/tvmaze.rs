use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{BaseUrl, ProviderError, read_json};

pub const TVMAZE_API_BASE: &str = "https://api.tvmaze.com";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeChannel {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeSchedule {
    pub time: String,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeRating {
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeExternals {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
    pub imdb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TvMazeShow {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub runtime: Option<u32>,
    pub average_runtime: Option<u32>,
    pub premiered: Option<String>,
    pub ended: Option<String>,
    pub official_site: Option<String>,
    pub schedule: Option<TvMazeSchedule>,
    pub rating: Option<TvMazeRating>,
    pub network: Option<TvMazeChannel>,
    pub web_channel: Option<TvMazeChannel>,
    pub externals: Option<TvMazeExternals>,
    pub image: Option<TvMazeImage>,
    pub summary: Option<String>,
}

impl TvMazeShow {
    /// Year parsed from the `premiered` date.
    pub fn premiere_year(&self) -> Option<i32> {
        self.premiered.as_deref().and_then(leading_year)
    }

    pub fn end_year(&self) -> Option<i32> {
        self.ended.as_deref().and_then(leading_year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TvMazeSeason {
    pub id: u64,
    pub number: Option<u32>,
    pub name: Option<String>,
    pub episode_order: Option<u32>,
    pub premiere_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<TvMazeImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvMazeSearchResult {
    pub score: Option<f64>,
    pub show: TvMazeShow,
}

pub(crate) fn leading_year(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}

#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: Client,
    base: BaseUrl,
}

impl TvMazeClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base: BaseUrl::parse(base_url)?,
        })
    }

    /// Resolve a show from its IMDb id. `Ok(None)` when TVMaze has no match.
    pub async fn lookup_by_imdb(
        &self,
        imdb_id: &str,
    ) -> Result<Option<TvMazeShow>, ProviderError> {
        let url = self.base.join("lookup/shows");
        debug!("TVMaze lookup for imdb id {}", imdb_id);

        let response = self
            .client
            .get(&url)
            .query(&[("imdb", imdb_id)])
            .send()
            .await?;

        match read_json::<TvMazeShow>("TVMaze", response).await {
            Ok(show) => Ok(Some(show)),
            Err(ProviderError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn search_shows(
        &self,
        query: &str,
    ) -> Result<Vec<TvMazeSearchResult>, ProviderError> {
        let url = self.base.join("search/shows");
        debug!("TVMaze search for: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;
        read_json("TVMaze", response).await
    }

    pub async fn seasons(
        &self,
        show_id: u64,
    ) -> Result<Vec<TvMazeSeason>, ProviderError> {
        let url = self.base.join(&format!("shows/{show_id}/seasons"));
        let response = self.client.get(&url).send().await?;
        read_json("TVMaze", response).await
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::providers::{DEFAULT_REQUEST_TIMEOUT, http_client, test_support};

    async fn client_for(router: Router) -> TvMazeClient {
        let base = test_support::serve(router).await;
        TvMazeClient::new(http_client(DEFAULT_REQUEST_TIMEOUT).unwrap(), &base)
            .unwrap()
    }

    #[test]
    fn show_shape_decodes_camel_case() {
        let show: TvMazeShow = serde_json::from_value(json!({
            "id": 82,
            "name": "Game of Thrones",
            "type": "Scripted",
            "averageRuntime": 61,
            "premiered": "2011-04-17",
            "ended": "2019-05-19",
            "officialSite": "http://www.hbo.com/game-of-thrones",
            "webChannel": null,
            "network": {"id": 8, "name": "HBO"},
            "externals": {"imdb": "tt0944947"},
            "image": {"medium": "m.jpg", "original": "o.jpg"}
        }))
        .unwrap();

        assert_eq!(show.average_runtime, Some(61));
        assert_eq!(show.premiere_year(), Some(2011));
        assert_eq!(show.end_year(), Some(2019));
        assert_eq!(show.network.unwrap().name, "HBO");
        assert!(show.web_channel.is_none());
    }

    #[tokio::test]
    async fn lookup_miss_is_none() {
        let client = client_for(Router::new().route(
            "/lookup/shows",
            get(|| async { StatusCode::NOT_FOUND }),
        ))
        .await;
        assert_eq!(client.lookup_by_imdb("tt0000000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn seasons_are_listed() {
        let client = client_for(Router::new().route(
            "/shows/{id}/seasons",
            get(|| async {
                Json(json!([
                    {"id": 1, "number": 1, "episodeOrder": 10},
                    {"id": 2, "number": 2, "episodeOrder": 8}
                ]))
            }),
        ))
        .await;
        let seasons = client.seasons(82).await.unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[1].episode_order, Some(8));
    }
}
