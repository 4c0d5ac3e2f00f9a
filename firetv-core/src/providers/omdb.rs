use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{BaseUrl, ProviderError, read_json};

pub const OMDB_API_BASE: &str = "https://www.omdbapi.com";

/// OMDB title record. Missing values arrive as the literal string `"N/A"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OmdbTitle {
    pub title: Option<String>,
    pub year: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster: Option<String>,
    pub box_office: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub response: Option<String>,
    pub error: Option<String>,
}

impl OmdbTitle {
    pub fn is_found(&self) -> bool {
        self.response.as_deref() == Some("True")
    }
}

/// How to address a title.
#[derive(Debug, Clone, Copy)]
pub enum OmdbLookup<'a> {
    ImdbId(&'a str),
    Title(&'a str),
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base: BaseUrl,
    api_key: String,
}

impl OmdbClient {
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

    /// Full-plot lookup. OMDB answers misses with 200 and `Response: "False"`,
    /// which is reported as [`ProviderError::NotFound`].
    pub async fn fetch(
        &self,
        lookup: OmdbLookup<'_>,
    ) -> Result<OmdbTitle, ProviderError> {
        let (param, value) = match lookup {
            OmdbLookup::ImdbId(id) => ("i", id),
            OmdbLookup::Title(title) => ("t", title),
        };
        debug!("OMDB lookup {}={}", param, value);

        let response = self
            .client
            .get(self.base.join("/"))
            .query(&[
                (param, value),
                ("apikey", self.api_key.as_str()),
                ("plot", "full"),
            ])
            .send()
            .await?;

        let title: OmdbTitle = read_json("OMDB", response).await?;
        if !title.is_found() {
            debug!("OMDB miss: {}", title.error.as_deref().unwrap_or("unknown"));
            return Err(ProviderError::NotFound);
        }
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::get};
    use serde_json::json;

    use super::*;
    use crate::providers::{DEFAULT_REQUEST_TIMEOUT, http_client, test_support};

    #[tokio::test]
    async fn false_response_is_not_found() {
        let base = test_support::serve(Router::new().route(
            "/",
            get(|| async {
                Json(json!({"Response": "False", "Error": "Movie not found!"}))
            }),
        ))
        .await;
        let client = OmdbClient::new(
            http_client(DEFAULT_REQUEST_TIMEOUT).unwrap(),
            &base,
            "k",
        )
        .unwrap();

        let err = client.fetch(OmdbLookup::Title("Nope")).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound));
    }

    #[test]
    fn pascal_case_fields_decode() {
        let title: OmdbTitle = serde_json::from_value(json!({
            "Title": "Heat",
            "BoxOffice": "$67,436,818",
            "imdbRating": "8.3",
            "imdbID": "tt0113277",
            "Type": "movie",
            "Response": "True"
        }))
        .unwrap();
        assert!(title.is_found());
        assert_eq!(title.box_office.as_deref(), Some("$67,436,818"));
        assert_eq!(title.imdb_id.as_deref(), Some("tt0113277"));
    }
}
