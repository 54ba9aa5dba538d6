use tracing::{debug, warn};
use uuid::Uuid;

use crate::awareness::Awareness;
use crate::models::messages::MESSAGE_AWARENESS;
use crate::ws::registry::{RegistryError, RoomRegistry};

/// Handle any message the relay does not interpret: fan it out to every other
/// client of the room.
///
/// Awareness updates in the global awareness room are classified first. The
/// classification is only logged; delivery never depends on it. Decoding runs
/// before the registry lock is taken so a large update cannot stall other rooms.
pub async fn handle_relay_message(
    registry: &RoomRegistry,
    client_id: Uuid,
    kind: u8,
    raw: &[u8],
    awareness: &mut Awareness,
    awareness_room: &str,
) -> Result<usize, RegistryError> {
    if kind == MESSAGE_AWARENESS {
        let room_id = registry
            .room_of(client_id)
            .await
            .ok_or(RegistryError::UnknownClient(client_id))?;
        if room_id == awareness_room {
            match awareness.apply_update(&raw[1..]) {
                Ok(changes) if !changes.is_empty() => debug!(
                    "Awareness change from {}: added={:?} updated={:?} filtered_updated={:?} removed={:?}",
                    client_id, changes.added, changes.updated, changes.filtered_updated, changes.removed
                ),
                Ok(_) => {}
                Err(e) => warn!("Undecodable awareness update from {}: {}", client_id, e),
            }
        }
    }

    registry
        .with_client_room(client_id, |_, room| room.broadcast(&client_id, raw))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use crate::awareness::{encode_awareness_update, AwarenessRecord};
    use crate::ws::client::ClientHandle;

    const AWARENESS_ROOM: &str = "JupyterLab:globalAwareness";

    fn awareness_message(state: serde_json::Value) -> Vec<u8> {
        let mut msg = vec![MESSAGE_AWARENESS];
        msg.extend(encode_awareness_update(&[AwarenessRecord {
            client_id: 7,
            clock: 1,
            state: Some(state),
        }]));
        msg
    }

    #[tokio::test]
    async fn awareness_is_classified_and_still_relayed() {
        let registry = RoomRegistry::new();
        let (a, _rx_a) = ClientHandle::channel(Uuid::new_v4());
        let (b, mut rx_b) = ClientHandle::channel(Uuid::new_v4());
        let a_id = a.id();
        registry.join(AWARENESS_ROOM, a).await;
        registry.join(AWARENESS_ROOM, b).await;

        let msg = awareness_message(json!({"user": "ada"}));
        let mut awareness = Awareness::new();
        let delivered =
            handle_relay_message(&registry, a_id, MESSAGE_AWARENESS, &msg, &mut awareness, AWARENESS_ROOM)
                .await
                .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(rx_b.try_recv().unwrap(), msg);
        assert_eq!(awareness.state(7), Some(&json!({"user": "ada"})));
    }

    #[tokio::test]
    async fn awareness_outside_the_global_room_is_not_decoded() {
        let registry = RoomRegistry::new();
        let (a, _rx_a) = ClientHandle::channel(Uuid::new_v4());
        let a_id = a.id();
        registry.join("notebook", a).await;

        let msg = awareness_message(json!({"user": "ada"}));
        let mut awareness = Awareness::new();
        handle_relay_message(&registry, a_id, MESSAGE_AWARENESS, &msg, &mut awareness, AWARENESS_ROOM)
            .await
            .unwrap();

        assert_eq!(awareness.state(7), None);
    }

    #[tokio::test]
    async fn unknown_sender_is_an_error() {
        let registry = RoomRegistry::new();
        let id = Uuid::new_v4();
        let mut awareness = Awareness::new();
        let result =
            handle_relay_message(&registry, id, MESSAGE_AWARENESS, &[1, 0], &mut awareness, AWARENESS_ROOM).await;
        assert_eq!(result, Err(RegistryError::UnknownClient(id)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn large_awareness_update_does_not_block_other_rooms() {
        let registry = Arc::new(RoomRegistry::new());
        let (a, _rx_a) = ClientHandle::channel(Uuid::new_v4());
        let (other, _rx_other) = ClientHandle::channel(Uuid::new_v4());
        let a_id = a.id();
        registry.join(AWARENESS_ROOM, a).await;
        registry.join("other", other).await;

        let msg = awareness_message(json!({ "cursors": vec![1u8; 2_000_000] }));
        let relay = tokio::spawn({
            let registry = registry.clone();
            async move {
                let mut awareness = Awareness::new();
                handle_relay_message(&registry, a_id, MESSAGE_AWARENESS, &msg, &mut awareness, AWARENESS_ROOM)
                    .await
            }
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        let lookup = tokio::time::timeout(Duration::from_millis(100), registry.contains("other")).await;
        assert_eq!(lookup, Ok(true));
        assert!(!relay.is_finished(), "decode finished before the lookup could overlap it");

        assert_eq!(relay.await.unwrap(), Ok(0));
    }
}
