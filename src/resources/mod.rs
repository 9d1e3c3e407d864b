//! Resource registry for scraped pages
//!
//! Every successful `scrape_to_markdown` call produces one resource,
//! addressable as `scrape://<uuid>` for the rest of the session. Clients can
//! list and read them, and subscribe to per-resource update notifications.

pub mod errors;
pub mod events;
pub mod registry;
pub mod types;

pub use errors::RegistryError;
pub use events::{DiscardEvents, ResourceEvent, ResourceEventBus, ResourceEventSink};
pub use registry::ResourceRegistry;
pub use types::{Resource, ResourceSummary, ResourceUri, SubscriberId};
