//! Watch-party socket events.
//!
//! Frames are JSON objects shaped `{"event": "...", "data": {...}}`.

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::party::{ChatMessage, PartyId};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "event", content = "data", rename_all = "camelCase")
)]
pub enum ClientEvent {
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    JoinParty { party_id: PartyId },
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    SendMessage {
        party_id: PartyId,
        sender: String,
        sender_name: String,
        content: String,
    },
}

/// Frames the server emits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "event", content = "data", rename_all = "camelCase")
)]
pub enum ServerEvent {
    /// Broadcast to every member of the room the message was posted to.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    ReceiveMessage {
        sender: String,
        sender_name: String,
        content: String,
        timestamp: DateTime<Utc>,
    },
    /// Sent to the joining socket only.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Joined { party_id: PartyId },
    /// Sent to the offending socket only.
    Error { message: String },
}

impl From<&ChatMessage> for ServerEvent {
    fn from(message: &ChatMessage) -> Self {
        ServerEvent::ReceiveMessage {
            sender: message.sender.clone(),
            sender_name: message.sender_name.clone(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_frames_use_event_envelope() {
        let raw = json!({
            "event": "sendMessage",
            "data": {
                "partyId": "p1",
                "sender": "neo",
                "senderName": "Thomas",
                "content": "hi"
            }
        });
        let event: ClientEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage {
                party_id: PartyId::from("p1"),
                sender: "neo".into(),
                sender_name: "Thomas".into(),
                content: "hi".into(),
            }
        );

        let join: ClientEvent = serde_json::from_value(
            json!({"event": "joinParty", "data": {"partyId": "p1"}}),
        )
        .unwrap();
        assert!(matches!(join, ClientEvent::JoinParty { .. }));
    }

    #[test]
    fn receive_message_is_camel_case() {
        let event = ServerEvent::ReceiveMessage {
            sender: "neo".into(),
            sender_name: "Thomas".into(),
            content: "hi".into(),
            timestamp: DateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "receiveMessage");
        assert_eq!(json["data"]["senderName"], "Thomas");
    }
}
