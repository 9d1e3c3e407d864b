//! Content rendering: URL in, rendered document plus content-type hint out
//!
//! The renderer is the only component that touches the network. It is
//! failure-prone by nature, so every failure is a typed `RenderError` that
//! the orchestrator turns into a degraded artifact instead of a protocol
//! error.

pub mod chromium;
pub mod session;
pub mod timeout;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use chromium::ChromiumRenderer;
pub use session::{BrowserSession, ScopedEngine, with_browser, with_engine};

/// Per-call rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// When false, TLS certificate errors are ignored
    pub verify_ssl: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { verify_ssl: true }
    }
}

/// Rendered page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    /// Serialized DOM for HTML documents, document text otherwise
    pub content: String,
    /// Bare MIME type reported by the document, e.g. `text/html`
    pub content_type: Option<String>,
}

/// Errors that can occur while rendering a page
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid URL '{url}'")]
    InvalidUrl { url: String },

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Error navigating to {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{operation} timeout after {} seconds", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Error retrieving page content: {0}")]
    Extraction(String),
}

/// Something that can fetch and render a URL
///
/// Implementations own whatever engine they use for exactly one call; no
/// engine state may leak between calls.
#[async_trait]
pub trait ContentRenderer: Send + Sync {
    async fn render(
        &self,
        url: &str,
        options: RenderOptions,
    ) -> Result<RenderedContent, RenderError>;
}

/// Strip parameters from a Content-Type value: `text/html; charset=utf-8` → `text/html`
#[must_use]
pub fn bare_mime_type(content_type: &str) -> Option<String> {
    let bare = content_type.split(';').next().unwrap_or_default().trim();
    if bare.is_empty() {
        None
    } else {
        Some(bare.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_parameters_are_dropped() {
        assert_eq!(
            bare_mime_type("text/html; charset=utf-8").as_deref(),
            Some("text/html")
        );
        assert_eq!(bare_mime_type("Text/Plain").as_deref(), Some("text/plain"));
        assert_eq!(bare_mime_type("  ; charset=utf-8"), None);
        assert_eq!(bare_mime_type(""), None);
    }

    #[test]
    fn timeout_message_reports_seconds() {
        let err = RenderError::Timeout {
            operation: "Page navigation",
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "Page navigation timeout after 30 seconds");
    }
}
