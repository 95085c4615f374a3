//! WebSocket View Push
//!
//! Keeps connected dashboards in step with the cursor.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: active connections and their subscriptions
//! - **Handler**: WebSocket upgrade and message processing
//! - **Messages**: client and server message formats
//! - **forward_view_updates**: relays the session's `ViewUpdate`s to the hub
//!
//! ## Topics
//!
//! - `view` - the full view, on subscribe and after every cursor change
//! - `system` - server notices
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8050/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['view']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'view') render(msg.view);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, WsEvent, SYSTEM_TOPIC, VIEW_TOPIC};

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::view::ViewUpdate;

/// Spawn a task pushing every committed view to `view` subscribers
///
/// Runs until the session's sender is dropped. If the task falls behind, the
/// skipped updates are lost and the next one is delivered; clients can spot
/// the gap in `sequence`.
pub fn forward_view_updates(
    mut updates: broadcast::Receiver<ViewUpdate>,
    hub: Arc<ConnectionHub>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let sequence = update.sequence;
                    let sent = hub.broadcast(&WsEvent::view(update)).await;
                    tracing::debug!(sequence, subscribers = sent, "Pushed view update");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "View forwarder lagged behind the session");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("View forwarder stopped");
    })
}
