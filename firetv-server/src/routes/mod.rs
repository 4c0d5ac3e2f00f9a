use axum::{
    Router,
    routing::{get, post},
};
use firetv_core::api::routes::{self, api};

use crate::{
    handlers::{
        chapters, content, health, parties, roulette, trailers, watchlist, websocket,
    },
    infra::app_state::AppState,
};

/// Every route the service exposes, before middleware.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(routes::PING, get(health::ping_handler))
        .route(routes::HEALTH, get(health::health_handler))
        .route(routes::SOCKET, get(websocket::websocket_handler))
        .merge(create_transcript_routes())
        .merge(create_catalog_routes())
        .merge(create_party_routes())
        .merge(create_watchlist_routes())
        .route(api::roulette::SPIN, post(roulette::spin_handler))
}

fn create_transcript_routes() -> Router<AppState> {
    Router::new()
        .route(
            api::transcript::CHAPTERS,
            get(chapters::generate_chapters_handler),
        )
        .route(
            api::transcript::CHAPTERS_BARE,
            get(chapters::missing_video_id_handler),
        )
}

fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        .route(api::trailers::FIND, get(trailers::find_trailer_handler))
        .route(api::content::SEARCH, get(content::search_content_handler))
        .route(api::content::ENRICH, post(content::enrich_content_handler))
        .route(api::content::DETAILS, post(content::content_details_handler))
}

fn create_party_routes() -> Router<AppState> {
    Router::new()
        .route(
            api::parties::COLLECTION,
            get(parties::list_parties_handler).post(parties::create_party_handler),
        )
        .route(api::parties::JOIN, post(parties::join_party_handler))
        .route(api::messages::BY_PARTY, get(parties::list_messages_handler))
}

fn create_watchlist_routes() -> Router<AppState> {
    Router::new()
        .route(
            api::watchlist::COLLECTION,
            get(watchlist::list_watchlist_handler).post(watchlist::add_to_watchlist_handler),
        )
        .route(
            api::watchlist::STATISTICS,
            get(watchlist::watchlist_statistics_handler),
        )
        .route(api::watchlist::NEXT, get(watchlist::next_to_watch_handler))
        .route(
            api::watchlist::BY_ID,
            get(watchlist::get_watchlist_item_handler)
                .patch(watchlist::update_watchlist_item_handler)
                .delete(watchlist::remove_watchlist_item_handler),
        )
}
