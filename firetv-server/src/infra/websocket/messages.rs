use anyhow::Result;
use axum::extract::ws::{Message, Utf8Bytes};
use firetv_model::{ClientEvent, ServerEvent};

/// Encode a server event as a text frame.
pub fn event_to_websocket(event: &ServerEvent) -> Result<Message> {
    let json = serde_json::to_string(event)?;
    Ok(Message::Text(Utf8Bytes::from(json)))
}

/// Decode a client frame. Text and binary frames both carry JSON.
pub fn websocket_to_event(msg: &Message) -> Result<ClientEvent> {
    match msg {
        Message::Text(text) => Ok(serde_json::from_str(text.as_str())?),
        Message::Binary(bin) => Ok(serde_json::from_slice(bin.as_ref())?),
        _ => Err(anyhow::anyhow!("Unsupported message type")),
    }
}
