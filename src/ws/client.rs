use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Send side of one connection.
///
/// Messages are queued in order and written to the socket by the connection's
/// own writer task, so delivering never blocks the caller.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    id: Uuid,
    tx: UnboundedSender<Vec<u8>>,
}

impl ClientHandle {
    /// Creates a handle for `id` and the receiver its writer task drains.
    pub fn channel(id: Uuid) -> (Self, UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues `msg` for delivery. Returns false once the connection is gone.
    pub fn deliver(&self, msg: Vec<u8>) -> bool {
        self.tx.send(msg).is_ok()
    }
}
