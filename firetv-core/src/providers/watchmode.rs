use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{BaseUrl, ProviderError, read_json};

pub const WATCHMODE_API_BASE: &str = "https://api.watchmode.com/v1";

/// A title as returned by Watchmode listings and search.
///
/// Listing endpoints, search results and TMDB-shaped rows all come through
/// here, so most fields have an alternate spelling.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchmodeTitle {
    pub id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub name: Option<String>,
    pub plot_overview: Option<String>,
    pub overview: Option<String>,
    pub poster: Option<String>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop: Option<String>,
    pub backdrop_path: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub user_rating: Option<f64>,
    pub vote_average: Option<f64>,
    pub year: Option<i32>,
    pub end_year: Option<i32>,
    pub imdb_id: Option<String>,
    pub tmdb_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub runtime: Option<u32>,
    pub genre_names: Option<Vec<String>>,
    pub critic_score: Option<f64>,
    pub us_rating: Option<String>,
    pub original_language: Option<String>,
}

/// `/title/{id}/details/` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchmodeDetails {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub plot_overview: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub year: Option<i32>,
    pub end_year: Option<i32>,
    pub release_date: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tmdb_type: Option<String>,
    pub genre_names: Option<Vec<String>>,
    pub user_rating: Option<f64>,
    pub critic_score: Option<f64>,
    pub us_rating: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub original_language: Option<String>,
    pub network_names: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WatchmodeSearchResponse {
    title_results: Vec<WatchmodeTitle>,
}

#[derive(Debug, Clone)]
pub struct WatchmodeClient {
    client: Client,
    base: BaseUrl,
    api_key: String,
}

impl WatchmodeClient {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base: BaseUrl::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Search titles by name.
    pub async fn search(
        &self,
        query: &str,
    ) -> Result<Vec<WatchmodeTitle>, ProviderError> {
        info!("Watchmode search for: {}", query);
        let url = self.base.join("search/");
        debug!("Watchmode request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("search_field", "name"),
                ("search_value", query),
            ])
            .send()
            .await?;

        let body: WatchmodeSearchResponse =
            read_json("Watchmode", response).await?;
        info!(
            "Watchmode search returned {} results",
            body.title_results.len()
        );
        Ok(body.title_results)
    }

    pub async fn title_details(
        &self,
        id: u64,
    ) -> Result<WatchmodeDetails, ProviderError> {
        let url = self.base.join(&format!("title/{id}/details/"));
        debug!("Watchmode request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;
        read_json("Watchmode", response).await
    }
}
