use axum::{
    Json,
    extract::{Query, State},
};
use firetv_core::TrailerQuery;
use firetv_model::TrailerPayload;
use serde::Deserialize;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct TrailerParams {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

pub async fn find_trailer_handler(
    State(state): State<AppState>,
    Query(params): Query<TrailerParams>,
) -> AppResult<Json<TrailerPayload>> {
    let title = params
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("title is required"))?;

    let query = TrailerQuery {
        title,
        year: params.year,
        season: params.season,
        episode: params.episode,
    };

    state
        .trailers
        .find(&query)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("No trailer available"))
}
