use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    info!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Fire TV companion server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// In-process checks only; upstream services are not probed.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let trailer_cache = state.trailers.cache();
    Json(json!({
        "status": "healthy",
        "timestamp": state.clock.now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "trailer_cache": {
                "entries": trailer_cache.len(),
                "max_entries": trailer_cache.policy().max_entries,
            },
            "sockets": {
                "connections": state.websocket_manager.connection_count(),
                "rooms": state.websocket_manager.room_count(),
            },
            "parties": state.parties.list().len(),
        }
    }))
}
