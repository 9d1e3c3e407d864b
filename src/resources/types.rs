//! Core types for the resource registry
//!
//! Identities, subscriber tokens, stored resources and the summaries handed
//! out by `list()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

use super::errors::RegistryError;
use crate::utils::{RESOURCE_SCHEME, RESOURCE_URI_PREFIX};

/// Opaque identity of a stored resource: `scrape://<uuid v4>`
///
/// Generated once at creation and never reused, even after `cleanup()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUri(String);

impl ResourceUri {
    /// Mint a fresh identity under the server's scheme
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{RESOURCE_URI_PREFIX}{}", Uuid::new_v4()))
    }

    /// Accept a URI from the protocol boundary
    ///
    /// Only the scheme is checked. A well-formed `scrape://` URI that was never
    /// issued parses fine and then fails lookup with `NotFound`.
    pub fn parse(uri: &str) -> Result<Self, RegistryError> {
        match uri.split_once("://") {
            Some((scheme, rest)) if scheme == RESOURCE_SCHEME && !rest.is_empty() => {
                Ok(Self(uri.to_string()))
            }
            Some((scheme, _)) => Err(RegistryError::UnsupportedScheme {
                uri: uri.to_string(),
                scheme: scheme.to_string(),
            }),
            None => Err(RegistryError::UnsupportedScheme {
                uri: uri.to_string(),
                scheme: String::new(),
            }),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResourceUri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<ResourceUri> for String {
    fn from(uri: ResourceUri) -> Self {
        uri.0
    }
}

/// Opaque session token supplied by the protocol layer
///
/// The registry never interprets it; it only stores and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Random token for a freshly connected session
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scraped artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Scrape target exactly as the caller supplied it
    pub url: String,
    pub content: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    /// Set at creation and refreshed by every `update`
    pub last_modified: DateTime<Utc>,
}

impl Resource {
    pub(crate) fn new(url: String, content: String, mime_type: String) -> Self {
        let now = Utc::now();
        Self {
            url,
            content,
            mime_type,
            created_at: now,
            last_modified: now,
        }
    }

    #[must_use]
    pub fn summary(&self, uri: &ResourceUri) -> ResourceSummary {
        ResourceSummary {
            uri: uri.clone(),
            name: format!("Scraped: {}", self.url),
            description: format!("Web page scraped on {}", self.created_at.to_rfc3339()),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Listing entry returned by `ResourceRegistry::list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub uri: ResourceUri,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}
