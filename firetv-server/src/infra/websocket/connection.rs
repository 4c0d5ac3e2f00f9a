use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use firetv_core::Clock;
use firetv_model::{PartyId, ServerEvent};
use std::{fmt, sync::Arc};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::infra::auth::AuthenticatedUser;

/// Seconds without a ping before a socket counts as stale.
pub const PING_TIMEOUT_SECS: i64 = 60;

#[derive(Clone)]
pub struct Connection {
    /// Unique connection ID
    pub id: Uuid,
    pub user: Arc<AuthenticatedUser>,
    /// Party room this socket has joined, if any
    pub party_id: Arc<RwLock<Option<PartyId>>>,
    /// Outgoing frames for this socket
    sender: mpsc::Sender<ServerEvent>,
    pub last_ping: Arc<RwLock<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let party_id = self
            .party_id
            .try_read()
            .ok()
            .and_then(|guard| guard.clone());
        let last_ping = self.last_ping.try_read().ok().map(|guard| *guard);

        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user.user_id)
            .field("party_id", &party_id)
            .field("channel_closed", &self.sender.is_closed())
            .field("last_ping", &last_ping)
            .finish()
    }
}

impl Connection {
    pub fn new(
        user: AuthenticatedUser,
        sender: mpsc::Sender<ServerEvent>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user: Arc::new(user),
            party_id: Arc::new(RwLock::new(None)),
            sender,
            last_ping: Arc::new(RwLock::new(clock.now())),
            clock,
        }
    }

    pub async fn send_event(&self, event: ServerEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("Failed to send event: channel closed"))
    }

    pub async fn set_party(&self, party_id: Option<PartyId>) {
        *self.party_id.write().await = party_id;
    }

    pub async fn party(&self) -> Option<PartyId> {
        self.party_id.read().await.clone()
    }

    pub async fn update_ping(&self) {
        *self.last_ping.write().await = self.clock.now();
    }

    /// Open channel and pinged within [`PING_TIMEOUT_SECS`].
    pub async fn is_healthy(&self) -> bool {
        if self.sender.is_closed() {
            return false;
        }
        let last_ping = *self.last_ping.read().await;
        self.clock.now() - last_ping < TimeDelta::seconds(PING_TIMEOUT_SECS)
    }
}
