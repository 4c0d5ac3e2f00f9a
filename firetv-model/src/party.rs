use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Opaque watch-party identifier. Rooms on the socket channel are keyed by it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PartyId(String);

impl PartyId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for PartyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PartyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PartyId").field(&self.0).finish()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PartyMember {
    pub user_id: String,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PartyCreator {
    pub user_id: String,
    pub username: String,
}

/// A watch party. Titles are unique across the store.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Party {
    pub id: PartyId,
    pub title: String,
    pub is_private: bool,
    /// Required for private parties; never leaves the server.
    #[cfg_attr(feature = "serde", serde(skip_serializing, default))]
    pub password: Option<String>,
    pub members: Vec<PartyMember>,
    pub created_by: Option<PartyCreator>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("is_private", &self.is_private)
            .field("members", &self.members.len())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Party {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CreatePartyRequest {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_private: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_by: Option<PartyCreator>,
}

impl CreatePartyRequest {
    /// Trims the title and checks the private-party password rule.
    pub fn validate(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ModelError::EmptyField("title"));
        }
        let has_password = self
            .password
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if self.is_private && !has_password {
            return Err(ModelError::InvalidParty(
                "private parties require a password".to_string(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct JoinPartyRequest {
    pub user_id: String,
    pub username: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: Option<String>,
}

/// A chat line posted to a party.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChatMessage {
    pub id: Uuid,
    pub party_id: PartyId,
    /// Username of the author.
    pub sender: String,
    /// Display name of the author.
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
