//! Watch list routes. Every handler acts on the list of the bearer token's
//! user.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use firetv_core::WatchListError;
use firetv_model::{
    AddWatchListRequest, RemovedWatchListItem, UpdateWatchListRequest,
    WatchListItem, WatchListPage, WatchListQuery, WatchListStatistics,
    watchlist::{DEFAULT_NEXT_LIMIT, MAX_PAGE_SIZE},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct NextParams {
    pub limit: Option<usize>,
}

/// Ids that do not parse cannot name an item.
fn item_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| WatchListError::NotFound.into())
}

pub async fn list_watchlist_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<WatchListQuery>, QueryRejection>,
) -> AppResult<Json<WatchListPage>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    Ok(Json(state.watchlist.list(&user.user_id, &query)))
}

pub async fn add_to_watchlist_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<AddWatchListRequest>,
) -> AppResult<(StatusCode, Json<WatchListItem>)> {
    let item = state.watchlist.add(&user.user_id, request)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn watchlist_statistics_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<WatchListStatistics> {
    Json(state.watchlist.statistics(&user.user_id))
}

/// Highest priority first, `limit` defaults to 10.
pub async fn next_to_watch_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<NextParams>, QueryRejection>,
) -> AppResult<Json<Vec<WatchListItem>>> {
    let Query(params) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_NEXT_LIMIT)
        .clamp(1, MAX_PAGE_SIZE);
    Ok(Json(state.watchlist.next_to_watch(&user.user_id, limit)))
}

pub async fn get_watchlist_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<WatchListItem>> {
    let item = state.watchlist.get(&user.user_id, &item_id(&id)?)?;
    Ok(Json(item))
}

pub async fn update_watchlist_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateWatchListRequest>,
) -> AppResult<Json<WatchListItem>> {
    let item = state
        .watchlist
        .update(&user.user_id, &item_id(&id)?, request)?;
    Ok(Json(item))
}

pub async fn remove_watchlist_item_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<RemovedWatchListItem>> {
    let removed = state.watchlist.remove(&user.user_id, &item_id(&id)?)?;
    Ok(Json(removed))
}
