//! HTTP clients for the third-party metadata and video APIs.
//!
//! Each client owns its base URL so tests can point it at a local server.
//! Every failure is reported as a [`ProviderError`]; callers decide on the
//! fallback.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

pub mod omdb;
pub mod tvmaze;
pub mod watchmode;
pub mod youtube;

pub use omdb::{OmdbClient, OmdbTitle};
pub use tvmaze::{
    TvMazeClient, TvMazeSearchResult, TvMazeSeason, TvMazeShow,
};
pub use watchmode::{WatchmodeClient, WatchmodeDetails, WatchmodeTitle};
pub use youtube::{YouTubeClient, YouTubeSearchResponse};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Shared outbound client. Every provider call is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("firetv-core/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ProviderError::NetworkError)
}

/// Validated base URL with any trailing slash removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let parsed = Url::parse(raw)
            .map_err(|e| ProviderError::InvalidBaseUrl(format!("{raw}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidBaseUrl(format!(
                "{raw}: unsupported scheme"
            )));
        }
        Ok(Self(raw.trim_end_matches('/').to_string()))
    }

    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Map the status code, then decode the body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    source: &'static str,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::InvalidApiKey);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(ProviderError::ApiError(format!(
            "{source} returned status: {status}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}
