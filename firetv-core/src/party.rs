//! In-memory watch parties and their chat history.

use std::{fmt, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use firetv_model::{
    ChatMessage, CreatePartyRequest, JoinPartyRequest, ModelError, Party,
    PartyId, PartyMember,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyError {
    #[error("{0}")]
    Invalid(#[from] ModelError),

    #[error("A party named {0:?} already exists")]
    DuplicateTitle(String),

    #[error("Party not found: {0}")]
    NotFound(PartyId),

    #[error("Incorrect party password")]
    WrongPassword,

    #[error("Message content must not be empty")]
    EmptyMessage,
}

pub struct PartyStore {
    parties: DashMap<PartyId, Party>,
    titles: DashMap<String, PartyId>,
    messages: DashMap<PartyId, Vec<ChatMessage>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for PartyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartyStore")
            .field("parties", &self.parties.len())
            .field("rooms_with_messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

impl PartyStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            parties: DashMap::new(),
            titles: DashMap::new(),
            messages: DashMap::new(),
            clock,
        }
    }

    /// All parties, oldest first.
    pub fn list(&self) -> Vec<Party> {
        let mut parties: Vec<Party> =
            self.parties.iter().map(|p| p.value().clone()).collect();
        parties.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
        });
        parties
    }

    pub fn get(&self, id: &PartyId) -> Option<Party> {
        self.parties.get(id).map(|p| p.value().clone())
    }

    pub fn exists(&self, id: &PartyId) -> bool {
        self.parties.contains_key(id)
    }

    pub fn create(&self, request: CreatePartyRequest) -> Result<Party, PartyError> {
        let request = request.validate()?;

        let id = PartyId::new();
        match self.titles.entry(request.title.clone()) {
            Entry::Occupied(_) => {
                return Err(PartyError::DuplicateTitle(request.title));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let password = if request.is_private {
            request.password.map(|p| p.trim().to_string())
        } else {
            None
        };
        let party = Party {
            id: id.clone(),
            title: request.title,
            is_private: request.is_private,
            password,
            members: Vec::new(),
            created_by: request.created_by,
            created_at: self.clock.now(),
        };
        self.parties.insert(id, party.clone());
        info!("Created party {} ({})", party.title, party.id);
        Ok(party)
    }

    /// Add a member. Joining twice is a no-op.
    pub fn join(
        &self,
        id: &PartyId,
        request: JoinPartyRequest,
    ) -> Result<Party, PartyError> {
        let mut party = self
            .parties
            .get_mut(id)
            .ok_or_else(|| PartyError::NotFound(id.clone()))?;

        if party.is_private {
            let supplied = request.password.as_deref().map(str::trim);
            if supplied != party.password.as_deref() {
                return Err(PartyError::WrongPassword);
            }
        }

        if !party.has_member(&request.user_id) {
            party.members.push(PartyMember {
                user_id: request.user_id,
                username: request.username,
                joined_at: self.clock.now(),
            });
            debug!("Party {} now has {} members", party.id, party.members.len());
        }
        Ok(party.clone())
    }

    /// Messages for a party, oldest first. Unknown parties have none.
    pub fn messages(&self, id: &PartyId) -> Vec<ChatMessage> {
        let mut messages = self
            .messages
            .get(id)
            .map(|m| m.value().clone())
            .unwrap_or_default();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages
    }

    /// Store a chat line and return it stamped.
    pub fn post_message(
        &self,
        party_id: &PartyId,
        sender: impl Into<String>,
        sender_name: impl Into<String>,
        content: &str,
    ) -> Result<ChatMessage, PartyError> {
        if !self.exists(party_id) {
            return Err(PartyError::NotFound(party_id.clone()));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(PartyError::EmptyMessage);
        }

        let message = ChatMessage {
            id: Uuid::now_v7(),
            party_id: party_id.clone(),
            sender: sender.into(),
            sender_name: sender_name.into(),
            content: content.to_string(),
            timestamp: self.clock.now(),
        };
        self.messages
            .entry(party_id.clone())
            .or_default()
            .push(message.clone());
        Ok(message)
    }
}
