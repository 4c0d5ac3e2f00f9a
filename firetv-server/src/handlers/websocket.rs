use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use firetv_model::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::infra::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppResult,
    websocket::{Connection, messages},
};

const OUTBOUND_BUFFER: usize = 100;
const PING_INTERVAL: Duration = Duration::from_secs(25);

#[derive(Debug, Deserialize)]
pub struct SocketParams {
    pub token: Option<String>,
}

/// `GET /socket?token=...`. The token is checked before the upgrade so an
/// unauthenticated client gets a plain 401.
pub async fn websocket_handler(
    State(state): State<AppState>,
    params: Result<Query<SocketParams>, QueryRejection>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let token = params.ok().and_then(|Query(p)| p.token);
    let user = state.tokens.verify(token.as_deref())?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER);

    let connection = Arc::new(Connection::new(user, tx, Arc::clone(&state.clock)));
    let conn_id = connection.id;
    state.websocket_manager.add_connection(connection.clone());
    info!("Socket connected: {} user: {}", conn_id, connection.user.user_id);

    // Outgoing events plus a periodic ping so idle browsers answer with pongs.
    let send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        ping.tick().await;
        loop {
            tokio::select! {
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    match messages::event_to_websocket(&event) {
                        Ok(frame) => {
                            if ws_sender.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => error!("Failed to encode socket event: {}", e),
                    }
                }
                _ = ping.tick() => {
                    if ws_sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                connection.update_ping().await;
            }
            Ok(Message::Close(_)) => break,
            Ok(frame) => {
                connection.update_ping().await;
                match messages::websocket_to_event(&frame) {
                    Ok(event) => handle_client_event(event, &state, &connection).await,
                    Err(e) => {
                        warn!("Ignoring malformed socket frame from {}: {}", conn_id, e);
                        send_or_log(
                            &connection,
                            ServerEvent::Error {
                                message: "Malformed event".to_string(),
                            },
                        )
                        .await;
                    }
                }
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    state.websocket_manager.remove_connection(conn_id);
    send_task.abort();
    info!("Socket disconnected: {}", conn_id);
}

async fn handle_client_event(event: ClientEvent, state: &AppState, connection: &Connection) {
    match event {
        ClientEvent::JoinParty { party_id } => {
            if !state.parties.exists(&party_id) {
                send_or_log(
                    connection,
                    ServerEvent::Error {
                        message: format!("Party not found: {party_id}"),
                    },
                )
                .await;
                return;
            }

            if let Some(previous) = connection.party().await {
                state.websocket_manager.leave_room(&previous, connection.id);
            }
            state
                .websocket_manager
                .join_room(party_id.clone(), connection.id);
            connection.set_party(Some(party_id.clone())).await;
            info!("User {} joined party {}", connection.user.user_id, party_id);

            send_or_log(connection, ServerEvent::Joined { party_id }).await;
        }
        ClientEvent::SendMessage {
            party_id,
            sender,
            sender_name,
            content,
        } => match state
            .parties
            .post_message(&party_id, sender, sender_name, &content)
        {
            Ok(message) => {
                debug!("Broadcasting message {} to party {}", message.id, party_id);
                state
                    .websocket_manager
                    .broadcast_to_room(&party_id, ServerEvent::from(&message))
                    .await;
            }
            Err(e) => {
                send_or_log(
                    connection,
                    ServerEvent::Error {
                        message: e.to_string(),
                    },
                )
                .await;
            }
        },
    }
}

async fn send_or_log(connection: &Connection, event: ServerEvent) {
    if let Err(e) = connection.send_event(event).await {
        error!("Failed to reply on socket {}: {}", connection.id, e);
    }
}
