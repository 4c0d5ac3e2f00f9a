//! Relay to the external chapter generation service.
//!
//! Responses keep the relay's own wire shape rather than the `AppError`
//! envelope used elsewhere.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use firetv_core::ChapterRelayError;
use firetv_model::{ChapterRelayFailure, ChapterRelaySuccess};
use serde_json::Value;
use tracing::info;

use crate::infra::app_state::AppState;

pub async fn generate_chapters_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Response {
    info!("Chapter request for video {}", video_id);
    match state.chapters.generate(&video_id).await {
        Ok(data) => Json(ChapterRelaySuccess::new(data)).into_response(),
        Err(err) => relay_error(err),
    }
}

/// `/chapters/` with no id segment.
pub async fn missing_video_id_handler() -> Response {
    relay_error(ChapterRelayError::MissingVideoId)
}

fn relay_error(err: ChapterRelayError) -> Response {
    let (status, body) = match err {
        ChapterRelayError::MissingVideoId => (
            StatusCode::BAD_REQUEST,
            ChapterRelayFailure::<Value> {
                error: "Video ID is required".to_string(),
                details: None,
            },
        ),
        ChapterRelayError::Upstream { status, detail } => (
            status,
            ChapterRelayFailure {
                error: "Python backend error".to_string(),
                details: Some(detail),
            },
        ),
        ChapterRelayError::Failed(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ChapterRelayFailure {
                error: "Failed to generate chapters".to_string(),
                details: Some(Value::String(message)),
            },
        ),
    };
    (status, Json(body)).into_response()
}
