//! WebSocket connection handler

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tracing::{debug, warn};

use super::state::AppState;
use crate::relay::{ConnectionId, Inbox};
use crate::types::ClientEvent;

/// How long a closing connection gets to flush its close reply
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection from open to close
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (id, inbox) = state.connect();
    let (sink, mut stream) = socket.split();

    let mut writer = tokio::spawn(forward_outbox(id, inbox, sink));
    let mut closing = false;

    loop {
        tokio::select! {
            result = stream.next() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(&state, &id, msg) {
                            closing = true;
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(connection_id = %id, error = %e, "websocket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }
            // Writer stops when the socket can no longer be written to
            _ = &mut writer => break,
        }
    }

    state.disconnect(&id);
    writer.abort();

    if closing {
        // The queued close reply is flushed by the next read, after which the stream ends
        let drain = async { while let Some(Ok(_)) = stream.next().await {} };
        if tokio::time::timeout(CLOSE_GRACE, drain).await.is_err() {
            debug!(connection_id = %id, "close reply not flushed in time");
        }
    }
}

/// Drain the connection's outbox onto the socket
async fn forward_outbox(id: ConnectionId, mut inbox: Inbox, mut sink: SplitSink<WebSocket, Message>) {
    while let Some(event) = inbox.recv().await {
        let json = match event.encode() {
            Ok(json) => json,
            Err(e) => {
                warn!(connection_id = %id, event = event.name(), error = %e, "failed to encode event");
                continue;
            }
        };
        if sink.send(Message::Text(json)).await.is_err() {
            break; // Client disconnected
        }
    }
}

/// Handle a frame from the client
/// Returns false if the connection should be closed
fn handle_client_message(state: &AppState, id: &ConnectionId, msg: Message) -> bool {
    match msg {
        Message::Text(text) => {
            match ClientEvent::decode(&text) {
                Ok(event) => {
                    state.dispatch(id, event);
                }
                Err(e) => debug!(connection_id = %id, error = %e, "dropping frame"),
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => false, // Client requested close
    }
}
