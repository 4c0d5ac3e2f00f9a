//! Client for the external chapter generation service.

use firetv_model::ChapterRequest;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::providers::{BaseUrl, ProviderError};

pub const DEFAULT_CHAPTER_SERVICE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum ChapterRelayError {
    #[error("Video ID is required")]
    MissingVideoId,

    /// The service answered with an error carrying a `detail` field.
    #[error("Chapter service returned {status}")]
    Upstream { status: StatusCode, detail: Value },

    /// Anything else: transport failures, error bodies without `detail`,
    /// unreadable success bodies.
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ChapterClient {
    client: Client,
    base: BaseUrl,
}

impl ChapterClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base: BaseUrl::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Ask the service for chapters and hand back its JSON untouched.
    pub async fn generate(&self, video_id: &str) -> Result<Value, ChapterRelayError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(ChapterRelayError::MissingVideoId);
        }

        let url = self.base.join("api/generate-chapters");
        debug!("Requesting chapters for {} from {}", video_id, url);

        let response = self
            .client
            .post(&url)
            .json(&ChapterRequest {
                video_id: video_id.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                error!("Chapter service unreachable: {}", e);
                ChapterRelayError::Failed(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| {
                error!("Chapter service returned unreadable body: {}", e);
                ChapterRelayError::Failed(e.to_string())
            });
        }

        let body: Option<Value> = response.json().await.ok();
        match body.and_then(|mut b| b.get_mut("detail").map(Value::take)) {
            Some(detail) if is_truthy(&detail) => {
                error!("Chapter service error {}: {}", status, detail);
                Err(ChapterRelayError::Upstream { status, detail })
            }
            _ => {
                error!("Chapter service failed with status {}", status);
                Err(ChapterRelayError::Failed(format!(
                    "Request failed with status code {}",
                    status.as_u16()
                )))
            }
        }
    }
}

/// `null`, `false`, `0` and `""` do not count as a detail.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::json;

    use super::*;
    use crate::providers::{DEFAULT_REQUEST_TIMEOUT, http_client, test_support};

    async fn client_for(router: Router) -> ChapterClient {
        let base = test_support::serve(router).await;
        ChapterClient::new(http_client(DEFAULT_REQUEST_TIMEOUT).unwrap(), &base).unwrap()
    }

    #[tokio::test]
    async fn success_body_is_passed_through() {
        let client = client_for(Router::new().route(
            "/api/generate-chapters",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"video_id": body["video_id"], "chapters": [{"start": 0, "title": "Intro"}]}))
            }),
        ))
        .await;

        let data = client.generate("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(data["video_id"], "dQw4w9WgXcQ");
        assert_eq!(data["chapters"][0]["title"], "Intro");
    }

    #[tokio::test]
    async fn detail_keeps_upstream_status() {
        let client = client_for(Router::new().route(
            "/api/generate-chapters",
            post(|| async {
                (AxumStatus::SERVICE_UNAVAILABLE, Json(json!({"detail": "overloaded"})))
            }),
        ))
        .await;

        match client.generate("abc").await {
            Err(ChapterRelayError::Upstream { status, detail }) => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(detail, json!("overloaded"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_without_detail_is_generic() {
        let client = client_for(Router::new().route(
            "/api/generate-chapters",
            post(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }),
        ))
        .await;

        assert!(matches!(
            client.generate("abc").await,
            Err(ChapterRelayError::Failed(_))
        ));
    }

    #[tokio::test]
    async fn falsy_detail_is_generic() {
        for detail in [json!(""), json!(false), json!(0), json!(null)] {
            let client = client_for(Router::new().route(
                "/api/generate-chapters",
                post(move || {
                    let detail = detail.clone();
                    async move {
                        (AxumStatus::SERVICE_UNAVAILABLE, Json(json!({ "detail": detail })))
                    }
                }),
            ))
            .await;

            match client.generate("abc").await {
                Err(ChapterRelayError::Failed(message)) => {
                    assert_eq!(message, "Request failed with status code 503");
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn structured_detail_is_kept() {
        let client = client_for(Router::new().route(
            "/api/generate-chapters",
            post(|| async {
                (
                    AxumStatus::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": [{ "msg": "field required" }] })),
                )
            }),
        ))
        .await;

        match client.generate("abc").await {
            Err(ChapterRelayError::Upstream { status, detail }) => {
                assert_eq!(status.as_u16(), 422);
                assert_eq!(detail[0]["msg"], "field required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_id_is_rejected_before_any_request() {
        let client = ChapterClient::new(
            http_client(DEFAULT_REQUEST_TIMEOUT).unwrap(),
            "http://127.0.0.1:9",
        )
        .unwrap();
        assert!(matches!(
            client.generate("  ").await,
            Err(ChapterRelayError::MissingVideoId)
        ));
    }
}
