use axum::{
    Json,
    extract::{Query, State},
};
use firetv_model::ContentItem;
use serde::Deserialize;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search_content_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ContentItem>>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request("q is required"))?;

    let results = state.content.search(query).await?;
    Ok(Json(results))
}

/// Fill the gaps in a catalog item. Provider failures leave it unchanged.
pub async fn enrich_content_handler(
    State(state): State<AppState>,
    Json(item): Json<ContentItem>,
) -> Json<ContentItem> {
    Json(state.content.enrich(item).await)
}

pub async fn content_details_handler(
    State(state): State<AppState>,
    Json(item): Json<ContentItem>,
) -> AppResult<Json<ContentItem>> {
    Ok(Json(state.content.details(item).await?))
}
