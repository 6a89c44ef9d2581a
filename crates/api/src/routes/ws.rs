//! WebSocket upgrade bridging a client socket to a session runner.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use session::SessionChannels;
use tracing::{debug, info};

use crate::AppState;

pub fn ws_router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, channels) = session::spawn_session(state.feed.clone(), state.store.clone()).await;
    info!(session = %id, "websocket client connected");

    let SessionChannels {
        client_tx,
        mut out_rx,
    } = channels;
    let (mut sink, mut stream) = socket.split();

    // Session output is pumped to the socket from its own task so a slow
    // reader never blocks inbound message handling.
    let outbound = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let Ok(text) = serde_json::to_string(&message) else {
                continue;
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                if client_tx.send(text).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Dropping the sender ends the runner's receive loop and tears the
    // session down.
    drop(client_tx);
    outbound.abort();
    debug!(session = %id, "websocket client disconnected");
}
