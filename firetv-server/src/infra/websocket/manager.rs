use crate::infra::websocket::connection::Connection;
use dashmap::DashMap;
use firetv_model::{PartyId, ServerEvent};
use std::{fmt, sync::Arc};
use uuid::Uuid;

#[derive(Clone)]
pub struct ConnectionManager {
    /// Active WebSocket connections mapped by connection ID
    connections: Arc<DashMap<Uuid, Arc<Connection>>>,
    /// Party rooms - maps party id to the connections that joined it
    rooms: Arc<DashMap<PartyId, Vec<Uuid>>>,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connection_count", &self.connections.len())
            .field("room_count", &self.rooms.len())
            .finish()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            rooms: Arc::new(DashMap::new()),
        }
    }

    pub fn add_connection(&self, connection: Arc<Connection>) {
        self.connections.insert(connection.id, connection);
    }

    /// Drop a connection and its room memberships.
    pub fn remove_connection(&self, conn_id: Uuid) {
        self.connections.remove(&conn_id);

        for mut room in self.rooms.iter_mut() {
            room.value_mut().retain(|id| id != &conn_id);
        }

        self.rooms.retain(|_, connections| !connections.is_empty());
    }

    /// Joining the same room twice is a no-op.
    pub fn join_room(&self, party_id: PartyId, conn_id: Uuid) {
        let mut room = self.rooms.entry(party_id).or_default();
        if !room.contains(&conn_id) {
            room.push(conn_id);
        }
    }

    pub fn leave_room(&self, party_id: &PartyId, conn_id: Uuid) {
        if let Some(mut room) = self.rooms.get_mut(party_id) {
            room.value_mut().retain(|id| id != &conn_id);
        }

        self.rooms
            .remove_if(party_id, |_, connections| connections.is_empty());
    }

    pub fn get_room_connections(&self, party_id: &PartyId) -> Vec<Arc<Connection>> {
        self.rooms
            .get(party_id)
            .map(|room| {
                room.iter()
                    .filter_map(|conn_id| self.connections.get(conn_id).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send `event` to every socket in the room.
    pub async fn broadcast_to_room(&self, party_id: &PartyId, event: ServerEvent) {
        let connections = self.get_room_connections(party_id);

        for conn in connections {
            if let Err(e) = conn.send_event(event.clone()).await {
                tracing::error!("Failed to send event to connection {}: {}", conn.id, e);
            }
        }
    }

    pub fn get_connection(&self, conn_id: &Uuid) -> Option<Arc<Connection>> {
        self.connections.get(conn_id).map(|c| c.clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Remove connections whose channel closed or that stopped pinging.
    /// Returns how many were dropped.
    pub async fn prune_stale(&self) -> usize {
        let candidates: Vec<Arc<Connection>> =
            self.connections.iter().map(|c| c.value().clone()).collect();

        let mut removed = 0;
        for conn in candidates {
            if !conn.is_healthy().await {
                self.remove_connection(conn.id);
                removed += 1;
            }
        }
        removed
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
