use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use uuid::Uuid;

use crate::awareness::Awareness;
use crate::config::RelaySettings;
use crate::models::messages::{ClientMessage, SYNC_STEP1_HANDSHAKE};
use crate::websocket::msg_content_handler::{handle_put_content, handle_request_content};
use crate::websocket::msg_lock_handler::{handle_acquire_lock, handle_release_lock};
use crate::websocket::msg_relay_handler::handle_relay_message;
use crate::websocket::msg_rename_handler::handle_rename;
use crate::ws::client::ClientHandle;
use crate::ws::registry::RoomRegistry;

/// One open connection: its room membership, outbox and awareness view.
pub struct Session {
    id: Uuid,
    registry: Arc<RoomRegistry>,
    outbox: ClientHandle,
    awareness: Awareness,
    settings: RelaySettings,
}

impl Session {
    /// Joins `room_id` and queues the sync handshake. The returned receiver
    /// yields everything that must be written to this connection, in order.
    pub async fn open(
        registry: Arc<RoomRegistry>,
        room_id: &str,
        settings: RelaySettings,
    ) -> (Self, UnboundedReceiver<Vec<u8>>) {
        let id = Uuid::new_v4();
        let (outbox, rx) = ClientHandle::channel(id);
        let awareness = Awareness::new();

        registry.join(room_id, outbox.clone()).await;
        outbox.deliver(SYNC_STEP1_HANDSHAKE.to_vec());
        info!("Session {} opened in room {} (awareness doc {})", id, room_id, awareness.doc_id());

        let session = Self {
            id,
            registry,
            outbox,
            awareness,
            settings,
        };
        (session, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn awareness(&self) -> &Awareness {
        &self.awareness
    }

    /// Current room, which follows renames.
    pub async fn room_id(&self) -> Option<String> {
        self.registry.room_of(self.id).await
    }

    /// Dispatches one inbound binary message. Malformed or undeliverable
    /// messages are logged and dropped; the connection stays open.
    pub async fn handle_message(&mut self, raw: &[u8]) {
        let msg = match ClientMessage::decode(raw) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Dropping malformed message from {}: {}", self.id, e);
                return;
            }
        };

        let registry = self.registry.as_ref();
        let result = match msg {
            ClientMessage::AcquireLock => {
                handle_acquire_lock(registry, self.id, self.settings.lock_window_secs, &self.outbox)
                    .await
                    .map(|_| ())
            }
            ClientMessage::ReleaseLock { token } => {
                handle_release_lock(registry, self.id, token).await.map(|_| ())
            }
            ClientMessage::RequestInitializedContent => {
                handle_request_content(registry, self.id, &self.outbox).await
            }
            ClientMessage::PutInitializedContent(content) => {
                handle_put_content(registry, self.id, content).await
            }
            ClientMessage::RenameSession { room_id } => handle_rename(registry, self.id, room_id).await,
            ClientMessage::Relay { kind, raw } => handle_relay_message(
                registry,
                self.id,
                kind,
                raw,
                &mut self.awareness,
                &self.settings.global_awareness_room,
            )
            .await
            .map(|_| ()),
        };

        if let Err(e) = result {
            warn!("Dropping message from {}: {}", self.id, e);
        }
    }

    /// Leaves the room. Nothing is delivered to this session afterwards.
    pub async fn close(self) {
        match self.registry.leave(self.id).await {
            Some(room_id) => info!("Session {} closed in room {}", self.id, room_id),
            None => warn!("Session {} closed without a room", self.id),
        }
    }
}
