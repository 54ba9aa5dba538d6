use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::messages::lock_acquired_reply;
use crate::ws::client::ClientHandle;
use crate::ws::registry::{RegistryError, RoomRegistry};
use crate::ws::room::LockOutcome;

/// Handle ACQUIRE_LOCK
pub async fn handle_acquire_lock(
    registry: &RoomRegistry,
    client_id: Uuid,
    window_secs: i64,
    outbox: &ClientHandle,
) -> Result<LockOutcome, RegistryError> {
    let now = Utc::now().timestamp();
    let (room_id, outcome) = registry
        .with_client_room(client_id, |room_id, room| {
            (room_id.to_string(), room.acquire_lock(client_id, now, window_secs))
        })
        .await?;

    match outcome {
        LockOutcome::Acquired(token) => {
            info!("Client {} acquired lock {} on room {}", client_id, token, room_id);
            outbox.deliver(lock_acquired_reply(token));
        }
        LockOutcome::Refreshed => debug!("Client {} refreshed lock on room {}", client_id, room_id),
        // no reply, the requester retries
        LockOutcome::Contended => debug!("Client {} waits for lock on room {}", client_id, room_id),
    }
    Ok(outcome)
}

/// Handle RELEASE_LOCK
pub async fn handle_release_lock(
    registry: &RoomRegistry,
    client_id: Uuid,
    token: u32,
) -> Result<bool, RegistryError> {
    let (room_id, released) = registry
        .with_client_room(client_id, |room_id, room| {
            (room_id.to_string(), room.release_lock(token))
        })
        .await?;

    if released {
        info!("Client {} released lock {} on room {}", client_id, token, room_id);
    } else {
        debug!("Ignoring release of stale lock {} on room {}", token, room_id);
    }
    Ok(released)
}
