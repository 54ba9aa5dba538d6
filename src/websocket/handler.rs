use std::sync::Arc;
use axum::{
    extract::{Extension, Path, State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tracing::{debug, info};
use futures_util::{StreamExt, SinkExt};

use crate::routes::auth_middleware::Caller;
use crate::state::AppState;
use crate::websocket::session::Session;


/// WebSocket handler
pub async fn websocket_handler(
    Path(room_id): Path<String>,
    Extension(caller): Extension<Caller>,
    State(app_state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    info!("New WebSocket connection attempt for room {} by {}", room_id, caller.0);
    ws.max_message_size(app_state.max_message_size)
        .max_frame_size(app_state.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, room_id, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, room_id: String, app_state: Arc<AppState>) {

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Join the room. Everything for this client goes through the outbox.
    let (mut session, mut outbox) =
        Session::open(app_state.registry.clone(), &room_id, app_state.relay.clone()).await;
    let session_id = session.id();

    // Drain the outbox into the socket, in order
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbox.recv().await {
            if sender.send(Message::Binary(msg)).await.is_err() {
                break;
            }
        }
    });

    // Dispatch incoming frames until the peer goes away
    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Binary(data))) => session.handle_message(&data).await,
                Some(Ok(Message::Text(_))) => debug!("Ignoring text frame from {}", session_id),
                Some(Ok(Message::Close(_))) | None => break,
                // ping/pong are answered by axum
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("WebSocket error on {}: {}", session_id, e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    // Leave the room before anything else can be dispatched to this client
    session.close().await;
    send_task.abort();
    info!("WebSocket connection {} terminated", session_id);
}
