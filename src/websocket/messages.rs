//! WebSocket Message Types
//!
//! Wire format between connected dashboards and the server. Every message is
//! a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::view::{DashboardView, ViewUpdate};

/// Topic carrying a full view on every cursor change
pub const VIEW_TOPIC: &str = "view";

/// Topic for server lifecycle notices
pub const SYSTEM_TOPIC: &str = "system";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics (`view`, `system`)
    Subscribe { topics: Vec<String> },
    /// Unsubscribe from topics
    Unsubscribe { topics: Vec<String> },
    /// Keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { connection_id: String },
    /// Topics accepted by a subscribe request
    Subscribed { topics: Vec<String> },
    /// Topics removed by an unsubscribe request
    Unsubscribed { topics: Vec<String> },
    /// Reply to `ping`
    Pong,
    Error { message: String },
    /// The view committed for the cursor
    View {
        /// Commit counter; a client seeing a gap has missed updates
        sequence: u64,
        view: Arc<DashboardView>,
    },
    /// Server notice on the `system` topic
    System { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// A message addressed to every subscriber of a topic
#[derive(Debug, Clone)]
pub struct WsEvent {
    pub topic: String,
    pub message: ServerMessage,
}

impl WsEvent {
    /// Push of a committed view
    pub fn view(update: ViewUpdate) -> Self {
        Self {
            topic: VIEW_TOPIC.to_string(),
            message: ServerMessage::View {
                sequence: update.sequence,
                view: update.view,
            },
        }
    }

    pub fn system(message: &str) -> Self {
        Self {
            topic: SYSTEM_TOPIC.to_string(),
            message: ServerMessage::System {
                message: message.to_string(),
            },
        }
    }
}
