//! WebSocket Connection Hub
//!
//! Tracks connections and their topic subscriptions and fans events out to
//! subscribers. Each connection is drained by its own send task through an
//! unbounded mpsc channel, so a slow client never blocks a broadcast.
//!
//! Lock order: `connections` before `subscriptions`, in every method that
//! holds both.
//!
//! A connection never receives a `view` message older than one it already
//! got, whether it came from a broadcast or a direct send.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent, SYSTEM_TOPIC, VIEW_TOPIC};

pub type ConnectionId = String;

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    /// Topic → subscribed connections
    subscriptions: RwLock<HashMap<String, HashSet<ConnectionId>>>,
    config: HubConfig,
}

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
        }
    }
}

struct ConnectionHandle {
    sender: mpsc::UnboundedSender<ServerMessage>,
    topics: HashSet<String>,
    /// One past the highest view sequence delivered, 0 before the first
    next_view: AtomicU64,
}

impl ConnectionHandle {
    /// False for a view at or below one already delivered
    fn accepts(&self, message: &ServerMessage) -> bool {
        match message {
            ServerMessage::View { sequence, .. } => {
                let previous = self
                    .next_view
                    .fetch_max(sequence.saturating_add(1), Ordering::AcqRel);
                previous <= *sequence
            }
            _ => true,
        }
    }

    fn deliver(&self, message: &ServerMessage) -> bool {
        !self.accepts(message) || self.sender.send(message.clone()).is_ok()
    }
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new connection
    ///
    /// Fails once `max_connections` connections are open.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                topics: HashSet::new(),
                next_view: AtomicU64::new(0),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Drop a connection and all of its subscriptions
    pub async fn unregister(&self, id: &str) {
        let Some(handle) = self.connections.write().await.remove(id) else {
            return;
        };

        let mut subs = self.subscriptions.write().await;
        for topic in handle.topics {
            remove_subscriber(&mut subs, &topic, id);
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics
    ///
    /// Unknown topics are skipped; the accepted ones are returned.
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut subscribed = Vec::new();

        for topic in topics {
            if !is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Invalid topic ignored");
                continue;
            }

            handle.topics.insert(topic.clone());
            subs.entry(topic.clone()).or_default().insert(id.to_string());
            subscribed.push(topic);
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed to topics");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics it holds
    pub async fn unsubscribe(
        &self,
        id: &str,
        topics: Vec<String>,
    ) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut unsubscribed = Vec::new();

        for topic in topics {
            if handle.topics.remove(&topic) {
                remove_subscriber(&mut subs, &topic, id);
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(connection_id = %id, topics = ?unsubscribed, "Unsubscribed from topics");
        Ok(unsubscribed)
    }

    /// Send an event to every subscriber of its topic
    ///
    /// Returns how many subscribers it was handed to, counting those that
    /// skip it as stale.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        let connections = self.connections.read().await;
        let subs = self.subscriptions.read().await;
        let Some(subscribers) = subs.get(&event.topic) else {
            return 0;
        };

        let sent = subscribers
            .iter()
            .filter_map(|id| connections.get(id))
            .filter(|handle| handle.deliver(&event.message))
            .count();

        tracing::trace!(topic = %event.topic, subscribers = sent, "Broadcast event");
        sent
    }

    /// Send a message to one connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        if handle.deliver(&message) {
            Ok(())
        } else {
            Err(HubError::SendFailed)
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map_or(0, HashSet::len)
    }
}

fn is_valid_topic(topic: &str) -> bool {
    topic == VIEW_TOPIC || topic == SYSTEM_TOPIC
}

fn remove_subscriber(subs: &mut HashMap<String, HashSet<ConnectionId>>, topic: &str, id: &str) {
    if let Some(subscribers) = subs.get_mut(topic) {
        subscribers.remove(id);
        if subscribers.is_empty() {
            subs.remove(topic);
        }
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartStyle;
    use crate::dataset::fixtures::{dataset, day};
    use crate::view::DashboardView;
    use std::sync::Arc;
    use std::time::Duration;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_topics() {
        assert!(is_valid_topic("view"));
        assert!(is_valid_topic("system"));

        assert!(!is_valid_topic("views"));
        assert!(!is_valid_topic(""));
        assert!(!is_valid_topic("view.*"));
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_skips_invalid_topics() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let subscribed = hub
            .subscribe(&id, topics(&["view", "metrics.mood"]))
            .await
            .unwrap();
        assert_eq!(subscribed, vec!["view"]);
        assert_eq!(hub.subscription_count("view").await, 1);

        let unsubscribed = hub
            .unsubscribe(&id, topics(&["view", "system"]))
            .await
            .unwrap();
        assert_eq!(unsubscribed, vec!["view"]);
        assert_eq!(hub.subscription_count("view").await, 0);
    }

    #[tokio::test]
    async fn test_unregister_clears_subscriptions() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, topics(&["view", "system"])).await.unwrap();

        hub.unregister(&id).await;
        assert_eq!(hub.subscription_count("view").await, 0);
        assert_eq!(hub.subscription_count("system").await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_connection() {
        let hub = ConnectionHub::new(HubConfig::default());
        let result = hub.subscribe("missing", topics(&["view"])).await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 2 });

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();
        let (tx3, _) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        hub.register(tx2).await.unwrap();
        let err = hub.register(tx3).await.unwrap_err();

        assert!(matches!(err, HubError::TooManyConnections(2)));
        assert_eq!(err.to_string(), "Too many connections (limit: 2)");
    }

    #[tokio::test]
    async fn test_broadcast_to_subscribers_only() {
        let hub = ConnectionHub::new(HubConfig::default());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();

        hub.subscribe(&id1, topics(&["system"])).await.unwrap();
        hub.subscribe(&id2, topics(&["view"])).await.unwrap();

        let sent = hub.broadcast(&WsEvent::system("reloading")).await;
        assert_eq!(sent, 1);

        match rx1.try_recv().unwrap() {
            ServerMessage::System { message } => assert_eq!(message, "reloading"),
            other => panic!("Expected System, got {:?}", other),
        }
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let hub = ConnectionHub::new(HubConfig::default());
        assert_eq!(hub.broadcast(&WsEvent::system("idle")).await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_subscribe_during_broadcast_does_not_hang() {
        let hub = Arc::new(ConnectionHub::new(HubConfig { max_connections: 64 }));

        let mut ids = Vec::new();
        let mut receivers = Vec::new();
        for _ in 0..50 {
            let (tx, rx) = mpsc::unbounded_channel();
            ids.push(hub.register(tx).await.unwrap());
            receivers.push(rx);
        }

        let churn = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move {
                for round in 0..5_000 {
                    let id = &ids[round % ids.len()];
                    hub.subscribe(id, topics(&["system"])).await.unwrap();
                    hub.unsubscribe(id, topics(&["system"])).await.unwrap();
                }
            })
        };
        let pushes = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move {
                for _ in 0..5_000 {
                    hub.broadcast(&WsEvent::system("tick")).await;
                }
            })
        };

        let finished = tokio::time::timeout(Duration::from_secs(30), async {
            churn.await.unwrap();
            pushes.await.unwrap();
        })
        .await;
        assert!(finished.is_ok(), "subscribe and broadcast stalled each other");
        drop(receivers);
    }

    fn view_message(sequence: u64) -> ServerMessage {
        let view = DashboardView::compute(&dataset(), &ChartStyle::default(), day(24)).unwrap();
        ServerMessage::View {
            sequence,
            view: Arc::new(view),
        }
    }

    fn view_sequence(message: ServerMessage) -> u64 {
        match message {
            ServerMessage::View { sequence, .. } => sequence,
            other => panic!("Expected View, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_view_is_skipped() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, topics(&["view"])).await.unwrap();

        // direct send of the committed view, then a lagging forwarder
        hub.send_to(&id, view_message(5)).await.unwrap();
        let event = WsEvent {
            topic: VIEW_TOPIC.to_string(),
            message: view_message(4),
        };
        hub.broadcast(&event).await;
        hub.broadcast(&WsEvent {
            topic: VIEW_TOPIC.to_string(),
            message: view_message(5),
        })
        .await;
        hub.broadcast(&WsEvent {
            topic: VIEW_TOPIC.to_string(),
            message: view_message(6),
        })
        .await;

        assert_eq!(view_sequence(rx.try_recv().unwrap()), 5);
        assert_eq!(view_sequence(rx.try_recv().unwrap()), 6);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_first_view_with_sequence_zero_is_delivered() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        hub.send_to(&id, view_message(0)).await.unwrap();
        assert_eq!(view_sequence(rx.try_recv().unwrap()), 0);
    }
}
