use tracing::info;
use uuid::Uuid;

use crate::ws::registry::{RegistryError, RoomRegistry};

/// Handle RENAME_SESSION
///
/// Every client of the room follows it to the new id. The clients learn about
/// the move through the shared document itself, so nothing is sent back.
pub async fn handle_rename(
    registry: &RoomRegistry,
    client_id: Uuid,
    new_room_id: &str,
) -> Result<(), RegistryError> {
    let old_room_id = registry.rename_client_room(client_id, new_room_id).await?;
    info!("Renamed room {} to {}", old_room_id, new_room_id);
    Ok(())
}
