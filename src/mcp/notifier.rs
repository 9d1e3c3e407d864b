//! Delivery of registry events to connected MCP clients
//!
//! The registry only computes events. `PeerNotifier` consumes them from the
//! event bus and pushes `notifications/resources/list_changed` to every
//! connected session, and `notifications/resources/updated` to the sessions
//! named in the event.

use async_trait::async_trait;
use parking_lot::Mutex;
use rmcp::model::ResourceUpdatedNotificationParam;
use rmcp::{Peer, RoleServer};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::resources::{ResourceEvent, SubscriberId};

/// Outbound notification channel to one client session
#[async_trait]
pub trait NotificationChannel: Clone + Send + Sync + 'static {
    async fn resource_list_changed(&self) -> anyhow::Result<()>;
    async fn resource_updated(&self, uri: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl NotificationChannel for Peer<RoleServer> {
    async fn resource_list_changed(&self) -> anyhow::Result<()> {
        self.notify_resource_list_changed().await?;
        Ok(())
    }

    async fn resource_updated(&self, uri: &str) -> anyhow::Result<()> {
        self.notify_resource_updated(ResourceUpdatedNotificationParam {
            uri: uri.to_string(),
        })
        .await?;
        Ok(())
    }
}

/// Session-to-channel map fed by the resource event bus
pub struct PeerNotifier<C = Peer<RoleServer>> {
    sessions: Arc<Mutex<HashMap<SubscriberId, C>>>,
}

impl<C> Clone for PeerNotifier<C> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<C> Default for PeerNotifier<C> {
    fn default() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<C> std::fmt::Debug for PeerNotifier<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerNotifier")
            .field("sessions", &self.sessions.lock().len())
            .finish()
    }
}

impl<C: NotificationChannel> PeerNotifier<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a session's channel; replaces any previous one for that session
    pub fn register(&self, session: SubscriberId, channel: C) {
        info!("Session {} connected for resource notifications", session);
        self.sessions.lock().insert(session, channel);
    }

    pub fn unregister(&self, session: &SubscriberId) {
        if self.sessions.lock().remove(session).is_some() {
            debug!("Session {} detached from resource notifications", session);
        }
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Consume events until the bus closes
    pub fn spawn(&self, mut events: broadcast::Receiver<ResourceEvent>) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => notifier.deliver(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        // Updates were lost; a list refresh is the best resync we can offer
                        warn!("Resource notifier lagged, {} event(s) dropped", skipped);
                        notifier.deliver(ResourceEvent::ListChanged).await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Resource event bus closed; notifier exiting");
                        break;
                    }
                }
            }
        })
    }

    /// Push one event to the sessions it is addressed to
    pub async fn deliver(&self, event: ResourceEvent) {
        // Snapshot under the lock, send without it
        let targets: Vec<(SubscriberId, C)> = {
            let sessions = self.sessions.lock();
            match &event {
                ResourceEvent::ListChanged => sessions
                    .iter()
                    .map(|(id, channel)| (id.clone(), channel.clone()))
                    .collect(),
                ResourceEvent::Updated { subscribers, .. } => subscribers
                    .iter()
                    .filter_map(|id| sessions.get(id).map(|channel| (id.clone(), channel.clone())))
                    .collect(),
            }
        };

        for (session, channel) in targets {
            let sent = match &event {
                ResourceEvent::ListChanged => channel.resource_list_changed().await,
                ResourceEvent::Updated { uri, .. } => channel.resource_updated(uri.as_str()).await,
            };
            if let Err(e) = sent {
                warn!("Failed to notify session {}: {:#}", session, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceUri;

    #[derive(Clone, Default)]
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationChannel for Recorder {
        async fn resource_list_changed(&self) -> anyhow::Result<()> {
            self.log.lock().push("list_changed".to_string());
            Ok(())
        }

        async fn resource_updated(&self, uri: &str) -> anyhow::Result<()> {
            self.log.lock().push(format!("updated {uri}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn list_changed_reaches_every_session() {
        let notifier = PeerNotifier::new();
        let (a, b) = (Recorder::default(), Recorder::default());
        notifier.register(SubscriberId::new("a"), a.clone());
        notifier.register(SubscriberId::new("b"), b.clone());

        notifier.deliver(ResourceEvent::ListChanged).await;

        assert_eq!(*a.log.lock(), vec!["list_changed"]);
        assert_eq!(*b.log.lock(), vec!["list_changed"]);
    }

    #[tokio::test]
    async fn updates_reach_only_named_subscribers() {
        let notifier = PeerNotifier::new();
        let (a, b) = (Recorder::default(), Recorder::default());
        notifier.register(SubscriberId::new("a"), a.clone());
        notifier.register(SubscriberId::new("b"), b.clone());

        let uri = ResourceUri::generate();
        notifier
            .deliver(ResourceEvent::Updated {
                uri: uri.clone(),
                subscribers: vec![SubscriberId::new("b"), SubscriberId::new("gone")],
            })
            .await;

        assert!(a.log.lock().is_empty());
        assert_eq!(*b.log.lock(), vec![format!("updated {uri}")]);
    }

    #[tokio::test]
    async fn spawned_notifier_drains_bus_and_stops_when_closed() {
        let notifier = PeerNotifier::new();
        let recorder = Recorder::default();
        notifier.register(SubscriberId::new("a"), recorder.clone());

        let (sender, receiver) = broadcast::channel(8);
        let task = notifier.spawn(receiver);
        sender.send(ResourceEvent::ListChanged).expect("receiver alive");
        drop(sender);
        task.await.expect("notifier task");

        assert_eq!(*recorder.log.lock(), vec!["list_changed"]);
    }

    #[tokio::test]
    async fn unregistered_sessions_get_nothing() {
        let notifier = PeerNotifier::new();
        let recorder = Recorder::default();
        let id = SubscriberId::new("a");
        notifier.register(id.clone(), recorder.clone());
        notifier.unregister(&id);

        notifier.deliver(ResourceEvent::ListChanged).await;
        assert!(recorder.log.lock().is_empty());
        assert_eq!(notifier.session_count(), 0);
    }
}
