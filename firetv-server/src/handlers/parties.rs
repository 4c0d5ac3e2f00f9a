use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use firetv_model::{ChatMessage, CreatePartyRequest, JoinPartyRequest, Party, PartyId};

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_parties_handler(State(state): State<AppState>) -> Json<Vec<Party>> {
    Json(state.parties.list())
}

pub async fn create_party_handler(
    State(state): State<AppState>,
    Json(request): Json<CreatePartyRequest>,
) -> AppResult<(StatusCode, Json<Party>)> {
    let party = state.parties.create(request)?;
    Ok((StatusCode::CREATED, Json(party)))
}

pub async fn join_party_handler(
    State(state): State<AppState>,
    Path(id): Path<PartyId>,
    Json(request): Json<JoinPartyRequest>,
) -> AppResult<Json<Party>> {
    let party = state.parties.join(&id, request)?;
    Ok(Json(party))
}

/// Chat history, oldest first.
pub async fn list_messages_handler(
    State(state): State<AppState>,
    Path(party_id): Path<PartyId>,
) -> Json<Vec<ChatMessage>> {
    Json(state.parties.messages(&party_id))
}
