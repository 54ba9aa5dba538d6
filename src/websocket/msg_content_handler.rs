use tracing::info;
use uuid::Uuid;

use crate::models::messages::initialized_content_reply;
use crate::ws::client::ClientHandle;
use crate::ws::registry::{RegistryError, RoomRegistry};

/// Handle REQUEST_INITIALIZED_CONTENT - reply to the sender only
pub async fn handle_request_content(
    registry: &RoomRegistry,
    client_id: Uuid,
    outbox: &ClientHandle,
) -> Result<(), RegistryError> {
    let reply = registry
        .with_client_room(client_id, |_, room| initialized_content_reply(room.content()))
        .await?;
    info!("Client {} requested initialized content ({} bytes)", client_id, reply.len() - 1);
    outbox.deliver(reply);
    Ok(())
}

/// Handle PUT_INITIALIZED_CONTENT
pub async fn handle_put_content(
    registry: &RoomRegistry,
    client_id: Uuid,
    content: &[u8],
) -> Result<(), RegistryError> {
    let room_id = registry
        .with_client_room(client_id, |room_id, room| {
            room.set_content(content.to_vec());
            room_id.to_string()
        })
        .await?;
    info!("Client {} stored initialized content for room {} ({} bytes)", client_id, room_id, content.len());
    Ok(())
}
