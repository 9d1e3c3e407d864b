//! HTML to markdown conversion
//!
//! `HtmlConverter` slims the document, then tries each backend in order:
//! pandoc when available, the in-process htmd converter, and finally a plain
//! text extraction. Conversion as a whole never fails; a backend failure only
//! moves on to the next one.

pub mod fallback;
pub mod pandoc;
pub mod postprocess;
pub mod slimdown;

use async_trait::async_trait;
use htmd::HtmlToMarkdown;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PandocConfig;

pub use fallback::extract_plain_text;
pub use pandoc::{Capability, PandocConverter};
pub use postprocess::clean_pandoc_markdown;
pub use slimdown::slim_html;

/// Failure of a single conversion backend
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("pandoc is not available")]
    Unavailable,

    #[error("Failed to start pandoc: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("I/O error talking to pandoc: {0}")]
    Io(#[source] std::io::Error),

    #[error("pandoc timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Failed(String),

    #[error("HTML rewrite failed: {0}")]
    Rewrite(String),
}

/// Turns an HTML document into markdown
#[async_trait]
pub trait MarkdownConverter: Send + Sync {
    async fn convert(&self, html: &str) -> String;
}

/// Tags whose content never belongs in the markdown
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// In-process conversion with htmd
///
/// # Errors
///
/// Returns `ConvertError::Failed` if htmd rejects the document.
pub fn convert_with_htmd(html: &str) -> Result<String, ConvertError> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();
    converter
        .convert(html)
        .map(|markdown| markdown.trim().to_string())
        .map_err(|e| ConvertError::Failed(format!("htmd conversion failed: {e}")))
}

/// The converter chain used by the server
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    pandoc: Arc<PandocConverter>,
}

impl HtmlConverter {
    #[must_use]
    pub fn new(pandoc: PandocConfig) -> Self {
        Self {
            pandoc: Arc::new(PandocConverter::new(pandoc)),
        }
    }

    #[must_use]
    pub fn pandoc_capability(&self) -> Capability {
        self.pandoc.capability()
    }
}

#[async_trait]
impl MarkdownConverter for HtmlConverter {
    async fn convert(&self, html: &str) -> String {
        let slim = match slim_html(html) {
            Ok(slim) => slim,
            Err(e) => {
                warn!("Slimming failed, converting original HTML: {}", e);
                html.to_string()
            }
        };

        match self.pandoc.convert(&slim).await {
            Ok(markdown) if !markdown.trim().is_empty() => return markdown,
            Ok(_) => debug!("pandoc produced no output; trying built-in converter"),
            Err(ConvertError::Unavailable) => {}
            Err(e) => warn!("pandoc conversion failed, trying built-in converter: {}", e),
        }

        // Both remaining backends are CPU-bound
        let result = tokio::task::spawn_blocking(move || match convert_with_htmd(&slim) {
            Ok(markdown) if !markdown.is_empty() => markdown,
            Ok(_) => {
                debug!("htmd produced no output; extracting plain text");
                extract_plain_text(&slim)
            }
            Err(e) => {
                warn!("{}; extracting plain text", e);
                extract_plain_text(&slim)
            }
        })
        .await;

        match result {
            Ok(markdown) => markdown,
            Err(e) => {
                warn!("Conversion task failed, extracting plain text: {}", e);
                extract_plain_text(html)
            }
        }
    }
}
