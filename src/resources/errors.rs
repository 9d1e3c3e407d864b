//! Error types for registry operations

use thiserror::Error;

/// Failures surfaced by `ResourceRegistry` and URI parsing
///
/// These propagate to the protocol boundary unchanged; nothing in the
/// registry absorbs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No subscription exists for resource: {0}")]
    NotSubscribed(String),

    #[error("Unsupported URI scheme '{scheme}' in {uri}")]
    UnsupportedScheme { uri: String, scheme: String },
}
