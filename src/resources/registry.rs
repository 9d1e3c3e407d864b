//! Session-scoped registry of scraped resources and their subscribers
//!
//! Provides thread-safe storage with change notifications. Both maps live
//! behind one lock so every operation is serialized with respect to the
//! others; events are emitted while that lock is held, which keeps the event
//! sequence in the same order as the mutations that caused it.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::errors::RegistryError;
use super::events::{DiscardEvents, ResourceEvent, ResourceEventSink};
use super::types::{Resource, ResourceSummary, ResourceUri, SubscriberId};

#[derive(Default)]
struct RegistryState {
    /// Insertion-ordered so listings come back in scrape order
    resources: IndexMap<ResourceUri, Resource>,
    /// Invariant: no entry ever holds an empty set
    subscriptions: HashMap<ResourceUri, BTreeSet<SubscriberId>>,
}

/// Registry for resources produced by the scrape tool
///
/// Owned by the server and shared by reference (`Arc`). Readers get clones,
/// never handles into the maps.
pub struct ResourceRegistry {
    state: Mutex<RegistryState>,
    events: Arc<dyn ResourceEventSink>,
}

impl ResourceRegistry {
    /// Create an empty registry that reports changes to `events`
    #[must_use]
    pub fn new(events: Arc<dyn ResourceEventSink>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            events,
        }
    }

    /// Create an empty registry with no event transport attached
    #[must_use]
    pub fn detached() -> Self {
        Self::new(Arc::new(DiscardEvents))
    }

    /// Store a new resource under a fresh identity
    ///
    /// Never deduplicates: the same URL scraped twice yields two resources.
    /// Emits `ListChanged` to all sessions.
    pub fn add(
        &self,
        url: impl Into<String>,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> ResourceUri {
        let uri = ResourceUri::generate();
        let resource = Resource::new(url.into(), content.into(), mime_type.into());

        let mut state = self.state.lock();
        log::debug!("Registering resource {} for {}", uri, resource.url);
        state.resources.insert(uri.clone(), resource);
        self.events.emit(ResourceEvent::ListChanged);

        uri
    }

    /// Look up a resource by identity
    pub fn get(&self, uri: &ResourceUri) -> Result<Resource, RegistryError> {
        self.state
            .lock()
            .resources
            .get(uri)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(uri.to_string()))
    }

    /// Summaries of every stored resource, in creation order
    #[must_use]
    pub fn list(&self) -> Vec<ResourceSummary> {
        self.state
            .lock()
            .resources
            .iter()
            .map(|(uri, resource)| resource.summary(uri))
            .collect()
    }

    /// Register `subscriber` for updates to `uri`
    ///
    /// Fails for identities that were never added. Subscribing twice is a no-op.
    pub fn subscribe(
        &self,
        uri: &ResourceUri,
        subscriber: &SubscriberId,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        if !state.resources.contains_key(uri) {
            return Err(RegistryError::NotFound(uri.to_string()));
        }

        let added = state
            .subscriptions
            .entry(uri.clone())
            .or_default()
            .insert(subscriber.clone());
        if added {
            log::debug!("Session {} subscribed to {}", subscriber, uri);
        }
        Ok(())
    }

    /// Remove `subscriber` from `uri`
    ///
    /// Fails when `uri` has no subscription entry at all. Succeeds without
    /// change when the entry exists but does not contain `subscriber`. Drops
    /// the entry once its last subscriber leaves.
    pub fn unsubscribe(
        &self,
        uri: &ResourceUri,
        subscriber: &SubscriberId,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        let Some(subscribers) = state.subscriptions.get_mut(uri) else {
            return Err(RegistryError::NotSubscribed(uri.to_string()));
        };

        if subscribers.remove(subscriber) {
            log::debug!("Session {} unsubscribed from {}", subscriber, uri);
        }
        if subscribers.is_empty() {
            state.subscriptions.remove(uri);
        }
        Ok(())
    }

    /// Replace a resource's content and MIME type in place
    ///
    /// Refreshes `last_modified` and emits `Updated` addressed to the
    /// subscribers registered for this identity right now.
    pub fn update(
        &self,
        uri: &ResourceUri,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        let Some(resource) = state.resources.get_mut(uri) else {
            return Err(RegistryError::NotFound(uri.to_string()));
        };

        resource.content = content.into();
        resource.mime_type = mime_type.into();
        resource.last_modified = chrono::Utc::now();

        let subscribers: Vec<SubscriberId> = state
            .subscriptions
            .get(uri)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        log::debug!(
            "Updated resource {} ({} subscriber(s) to notify)",
            uri,
            subscribers.len()
        );
        self.events.emit(ResourceEvent::Updated {
            uri: uri.clone(),
            subscribers,
        });
        Ok(())
    }

    /// Drop every resource and subscription
    pub fn cleanup(&self) {
        let mut state = self.state.lock();
        let count = state.resources.len();
        state.resources.clear();
        state.subscriptions.clear();
        log::debug!("Registry cleanup removed {} resource(s)", count);
    }

    /// Current subscribers for `uri`, or `None` when no subscription entry exists
    #[must_use]
    pub fn subscribers(&self, uri: &ResourceUri) -> Option<Vec<SubscriberId>> {
        self.state
            .lock()
            .subscriptions
            .get(uri)
            .map(|set| set.iter().cloned().collect())
    }

    /// Number of identities with at least one subscriber
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourceRegistry")
            .field("resources", &state.resources.len())
            .field("subscriptions", &state.subscriptions.len())
            .finish()
    }
}
