//! WebSocket Handler
//!
//! Upgrades `/api/v1/ws` requests and runs one send task and one receive
//! task per connection. A client that subscribes to `view` immediately gets
//! the view currently committed, then one push per cursor change. The hub
//! drops any push whose `sequence` is not newer than the view already sent,
//! so a lagging forwarder cannot deliver an older view after this one.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage, VIEW_TOPIC};
use crate::api::AppState;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let hub = Arc::clone(&state.ws_hub);

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected WebSocket connection");
            if let Some(msg) = encode(&ServerMessage::error(e.to_string())) {
                let _ = sender.send(msg).await;
            }
            return;
        }
    };

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    let greeted = match encode(&connected) {
        Some(msg) => sender.send(msg).await.is_ok(),
        None => false,
    };
    if !greeted {
        tracing::error!(connection_id = %connection_id, "Failed to send connected message");
        hub.unregister(&connection_id).await;
        return;
    }

    let conn_id_for_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Some(msg) = encode(&message) else {
                continue;
            };
            if sender.send(msg).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let state_for_recv = Arc::clone(&state);
    let conn_id_for_recv = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&state_for_recv, &conn_id_for_recv, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unregister(&connection_id).await;
}

/// Returns false if the connection should be closed.
async fn handle_ws_message(state: &AppState, connection_id: &str, message: Message) -> bool {
    let hub = &state.ws_hub;
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_client_message(state, connection_id, client_msg).await,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Invalid client message"
                    );
                    let error_msg = ServerMessage::error(format!("Invalid message format: {}", e));
                    let _ = hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::error("Binary messages not supported");
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

async fn handle_client_message(state: &AppState, connection_id: &str, message: ClientMessage) {
    let hub = &state.ws_hub;
    let reply = match message {
        ClientMessage::Subscribe { topics } => match hub.subscribe(connection_id, topics).await {
            Ok(subscribed) => {
                let wants_view = subscribed.iter().any(|t| t == VIEW_TOPIC);
                let _ = hub
                    .send_to(connection_id, ServerMessage::Subscribed { topics: subscribed })
                    .await;

                if !wants_view {
                    return;
                }
                let session = state.session.lock().await;
                ServerMessage::View {
                    sequence: session.sequence(),
                    view: session.view(),
                }
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "Subscribe error");
                ServerMessage::error(e.to_string())
            }
        },
        ClientMessage::Unsubscribe { topics } => {
            match hub.unsubscribe(connection_id, topics).await {
                Ok(unsubscribed) => ServerMessage::Unsubscribed {
                    topics: unsubscribed,
                },
                Err(e) => {
                    tracing::error!(connection_id = %connection_id, error = %e, "Unsubscribe error");
                    ServerMessage::error(e.to_string())
                }
            }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    };

    let _ = hub.send_to(connection_id, reply).await;
}
