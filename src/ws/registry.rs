use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::client::ClientHandle;
use super::room::Room;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("room '{0}' does not exist")]
    UnknownRoom(String),
    #[error("room '{0}' is already in use")]
    RoomExists(String),
    #[error("client {0} is not in any room")]
    UnknownClient(Uuid),
}

/// Counters reported by the diagnostics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub rooms: usize,
    pub connections: usize,
    pub locked_rooms: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    rooms: HashMap<String, Room>,
    /// Current room of every connected client.
    memberships: HashMap<Uuid, String>,
}

impl RegistryState {
    fn get_or_create(&mut self, room_id: &str) -> &mut Room {
        if !self.rooms.contains_key(room_id) {
            info!("Creating room {}", room_id);
        }
        self.rooms.entry(room_id.to_string()).or_default()
    }

    fn remove_if_empty(&mut self, room_id: &str) -> bool {
        if self.rooms.get(room_id).is_some_and(Room::is_empty) {
            self.rooms.remove(room_id);
            info!("Closed empty room {}", room_id);
            return true;
        }
        false
    }

    fn rename(&mut self, old_id: &str, new_id: &str) -> Result<(), RegistryError> {
        if !self.rooms.contains_key(old_id) {
            return Err(RegistryError::UnknownRoom(old_id.to_string()));
        }
        if old_id == new_id {
            return Ok(());
        }
        if self.rooms.contains_key(new_id) {
            return Err(RegistryError::RoomExists(new_id.to_string()));
        }

        let room = self
            .rooms
            .remove(old_id)
            .ok_or_else(|| RegistryError::UnknownRoom(old_id.to_string()))?;
        for client_id in room.client_ids() {
            self.memberships.insert(*client_id, new_id.to_string());
        }
        self.rooms.insert(new_id.to_string(), room);
        Ok(())
    }
}

/// Process-wide table of live rooms.
///
/// Every structural change and every room mutation happens under one lock,
/// so lookups never observe a half-finished rename.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    state: Mutex<RegistryState>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` to `room_id`, creating the room on first join.
    pub async fn join(&self, room_id: &str, handle: ClientHandle) {
        let mut state = self.state.lock().await;
        let client_id = handle.id();
        state.get_or_create(room_id).add_client(handle);
        state.memberships.insert(client_id, room_id.to_string());
        debug!("Client {} joined room {}", client_id, room_id);
    }

    /// Removes the client from its room and drops the room once empty.
    /// Returns the room the client was in.
    pub async fn leave(&self, client_id: Uuid) -> Option<String> {
        let mut state = self.state.lock().await;
        let room_id = state.memberships.remove(&client_id)?;
        if let Some(room) = state.rooms.get_mut(&room_id) {
            room.remove_client(&client_id);
        }
        state.remove_if_empty(&room_id);
        debug!("Client {} left room {}", client_id, room_id);
        Some(room_id)
    }

    pub async fn remove_if_empty(&self, room_id: &str) -> bool {
        self.state.lock().await.remove_if_empty(room_id)
    }

    /// Moves the room at `old_id` to `new_id`, updating every member.
    pub async fn rename(&self, old_id: &str, new_id: &str) -> Result<(), RegistryError> {
        self.state.lock().await.rename(old_id, new_id)
    }

    /// Renames whatever room `client_id` is in. Returns the previous id.
    pub async fn rename_client_room(
        &self,
        client_id: Uuid,
        new_id: &str,
    ) -> Result<String, RegistryError> {
        let mut state = self.state.lock().await;
        let old_id = state
            .memberships
            .get(&client_id)
            .cloned()
            .ok_or(RegistryError::UnknownClient(client_id))?;
        state.rename(&old_id, new_id)?;
        Ok(old_id)
    }

    /// Runs `f` against the client's current room while holding the lock.
    pub async fn with_client_room<R>(
        &self,
        client_id: Uuid,
        f: impl FnOnce(&str, &mut Room) -> R,
    ) -> Result<R, RegistryError> {
        let mut guard = self.state.lock().await;
        let RegistryState { rooms, memberships } = &mut *guard;
        let room_id = memberships
            .get(&client_id)
            .ok_or(RegistryError::UnknownClient(client_id))?;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::UnknownRoom(room_id.clone()))?;
        Ok(f(room_id.as_str(), room))
    }

    pub async fn room_of(&self, client_id: Uuid) -> Option<String> {
        self.state.lock().await.memberships.get(&client_id).cloned()
    }

    pub async fn contains(&self, room_id: &str) -> bool {
        self.state.lock().await.rooms.contains_key(room_id)
    }

    pub async fn client_count(&self, room_id: &str) -> usize {
        self.state
            .lock()
            .await
            .rooms
            .get(room_id)
            .map_or(0, Room::client_count)
    }

    pub async fn stats(&self) -> RegistryStats {
        let state = self.state.lock().await;
        RegistryStats {
            rooms: state.rooms.len(),
            connections: state.memberships.len(),
            locked_rooms: state.rooms.values().filter(|room| room.lock().is_some()).count(),
        }
    }
}
