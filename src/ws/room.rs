use std::collections::HashMap;

use uuid::Uuid;

use super::client::ClientHandle;

/// The initialization lock of a room.
///
/// The token is the acquisition time in Unix seconds and doubles as the
/// capability a client presents to release the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomLock {
    pub token: u32,
    pub holder: Uuid,
    pub last_refresh: i64,
}

/// Result of an `ACQUIRE_LOCK` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// The requester now holds a new lock; the token must be sent back.
    Acquired(u32),
    /// The requester already held the lock and refreshed it.
    Refreshed,
    /// Someone else holds a lock that is not stale yet.
    Contended,
}

/// A named broadcast group.
#[derive(Debug, Default)]
pub struct Room {
    lock: Option<RoomLock>,
    clients: HashMap<Uuid, ClientHandle>,
    content: Vec<u8>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&mut self, handle: ClientHandle) {
        self.clients.insert(handle.id(), handle);
    }

    pub fn remove_client(&mut self, client_id: &Uuid) -> Option<ClientHandle> {
        self.clients.remove(client_id)
    }

    pub fn client_ids(&self) -> impl Iterator<Item = &Uuid> {
        self.clients.keys()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn lock(&self) -> Option<&RoomLock> {
        self.lock.as_ref()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
    }

    /// Queues `msg` to every client except `sender`. Returns how many
    /// clients accepted it.
    pub fn broadcast(&self, sender: &Uuid, msg: &[u8]) -> usize {
        self.clients
            .values()
            .filter(|client| client.id() != *sender)
            .filter(|client| client.deliver(msg.to_vec()))
            .count()
    }

    /// Grants, refreshes or refuses the lock for `requester`.
    ///
    /// A held lock is stale once it has not been refreshed for more than
    /// `window_secs` seconds per connected client.
    pub fn acquire_lock(&mut self, requester: Uuid, now: i64, window_secs: i64) -> LockOutcome {
        let stale_after = window_secs.saturating_mul(self.clients.len() as i64);
        match self.lock {
            Some(lock) if now - lock.last_refresh <= stale_after => {
                if lock.holder == requester {
                    self.lock = Some(RoomLock { last_refresh: now, ..lock });
                    LockOutcome::Refreshed
                } else {
                    LockOutcome::Contended
                }
            }
            _ => {
                let token = now as u32;
                self.lock = Some(RoomLock {
                    token,
                    holder: requester,
                    last_refresh: now,
                });
                LockOutcome::Acquired(token)
            }
        }
    }

    /// Clears the lock if `token` matches the current one.
    pub fn release_lock(&mut self, token: u32) -> bool {
        match self.lock {
            Some(lock) if lock.token == token => {
                self.lock = None;
                true
            }
            _ => false,
        }
    }
}
