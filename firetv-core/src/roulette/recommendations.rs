use firetv_model::RecommendationInput;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::MAX_SEGMENTS;
use crate::providers::{BaseUrl, ProviderError, read_json};

/// Used when the recommender is unreachable or returns nothing usable.
pub const FALLBACK_TITLES: [&str; MAX_SEGMENTS] = [
    "The Shawshank Redemption",
    "Inception",
    "The Dark Knight",
    "Pulp Fiction",
    "Forrest Gump",
    "The Matrix",
    "Goodfellas",
    "The Godfather",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendRequest<'a> {
    input: &'a str,
    mode: &'static str,
    user_id: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecommendResponse {
    recommendations: Option<Value>,
    error: Option<String>,
}

/// Client for the external recommendation service.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    client: Client,
    base: BaseUrl,
}

impl RecommendationClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base: BaseUrl::parse(base_url)?,
        })
    }

    /// Raw titles as the service returned them.
    pub async fn recommend(
        &self,
        input: &RecommendationInput,
    ) -> Result<Vec<String>, ProviderError> {
        let body = RecommendRequest {
            input: &input.input,
            mode: input.mode.as_str(),
            user_id: input.user_id.as_deref(),
            format: "array",
        };
        let response = self
            .client
            .post(self.base.join("api/recommend"))
            .json(&body)
            .send()
            .await?;

        let body: RecommendResponse = read_json("Recommender", response).await?;
        if let Some(error) = body.error {
            return Err(ProviderError::ApiError(error));
        }
        let titles = match body.recommendations {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(_) => {
                return Err(ProviderError::ParseError(
                    "Invalid recommendations format received".into(),
                ));
            }
            None => {
                return Err(ProviderError::ParseError(
                    "No recommendations received".into(),
                ));
            }
        };
        if titles.is_empty() {
            return Err(ProviderError::ParseError(
                "No valid recommendations found".into(),
            ));
        }
        debug!("Recommender returned {} titles", titles.len());
        Ok(titles)
    }

    /// Exactly [`MAX_SEGMENTS`] candidates, falling back to a fixed list.
    pub async fn candidates(&self, input: &RecommendationInput) -> Vec<String> {
        match self.recommend(input).await {
            Ok(titles) => prepare_candidates(titles),
            Err(e) => {
                warn!("Recommendation request failed, using fallback titles: {}", e);
                FALLBACK_TITLES.iter().map(|t| t.to_string()).collect()
            }
        }
    }
}

/// Truncate to the wheel size and pad with numbered placeholders.
pub fn prepare_candidates(mut titles: Vec<String>) -> Vec<String> {
    titles.truncate(MAX_SEGMENTS);
    while titles.len() < MAX_SEGMENTS {
        titles.push(format!("Recommended Title {}", titles.len() + 1));
    }
    titles
}

/// Uniformly random candidate index.
pub fn pick_target<R: Rng>(titles: &[String], rng: &mut R) -> Option<usize> {
    if titles.is_empty() {
        None
    } else {
        Some(rng.random_range(0..titles.len()))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::post};
    use firetv_model::RouletteMode;
    use serde_json::json;

    use super::*;
    use crate::providers::{DEFAULT_REQUEST_TIMEOUT, http_client, test_support};

    async fn client_answering(body: Value) -> RecommendationClient {
        let router = Router::new().route(
            "/api/recommend",
            post(move |Json(req): Json<Value>| {
                let body = body.clone();
                async move {
                    assert_eq!(req["format"], "array");
                    assert_eq!(req["mode"], "chaos");
                    Json(body)
                }
            }),
        );
        let base = test_support::serve(router).await;
        RecommendationClient::new(http_client(DEFAULT_REQUEST_TIMEOUT).unwrap(), &base)
            .unwrap()
    }

    fn input() -> RecommendationInput {
        RecommendationInput {
            input: "space horror".into(),
            mode: RouletteMode::Chaos,
            user_id: Some("u1".into()),
        }
    }

    #[test]
    fn candidates_are_padded_and_truncated() {
        let padded = prepare_candidates(vec!["Alien".into(), "Event Horizon".into()]);
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[2], "Recommended Title 3");
        assert_eq!(padded[7], "Recommended Title 8");

        let many: Vec<String> = (0..12).map(|i| format!("T{i}")).collect();
        let truncated = prepare_candidates(many);
        assert_eq!(truncated.len(), 8);
        assert_eq!(truncated[7], "T7");
    }

    #[tokio::test]
    async fn accepts_comma_separated_titles() {
        let client = client_answering(json!({"recommendations": "Alien, Sunshine ,, Moon"})).await;
        assert_eq!(
            client.recommend(&input()).await.unwrap(),
            ["Alien", "Sunshine", "Moon"]
        );
    }

    #[tokio::test]
    async fn service_errors_fall_back() {
        let client = client_answering(json!({"error": "model offline"})).await;
        assert!(client.recommend(&input()).await.is_err());
        assert_eq!(client.candidates(&input()).await, FALLBACK_TITLES);
    }
}
