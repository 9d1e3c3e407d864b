//! Render, classify, convert: one URL in, one text artifact out

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::classify::{ContentKind, classify};
use crate::converter::MarkdownConverter;
use crate::renderer::{ContentRenderer, RenderOptions};
use crate::utils::normalize_url;

/// Which path produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePath {
    /// HTML converted to markdown
    Markdown,
    /// Non-HTML content wrapped in a code fence
    Fenced,
    /// Rendering failed; the text is a failure notice
    Failed,
}

/// Result of scraping one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeArtifact {
    pub text: String,
    pub path: ScrapePath,
}

/// Stateless pipeline over a renderer and a converter
#[derive(Clone)]
pub struct Scraper {
    renderer: Arc<dyn ContentRenderer>,
    converter: Arc<dyn MarkdownConverter>,
}

impl std::fmt::Debug for Scraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scraper").finish_non_exhaustive()
    }
}

impl Scraper {
    #[must_use]
    pub fn new(renderer: Arc<dyn ContentRenderer>, converter: Arc<dyn MarkdownConverter>) -> Self {
        Self {
            renderer,
            converter,
        }
    }

    /// Scrape `url` into a text artifact
    ///
    /// Never fails: render errors and empty documents become a failure notice.
    pub async fn scrape(&self, url: &str, options: RenderOptions) -> ScrapeArtifact {
        let target = normalize_url(url);
        info!("Scraping {}", target);

        let rendered = match self.renderer.render(&target, options).await {
            Ok(rendered) if !rendered.content.trim().is_empty() => rendered,
            Ok(_) => {
                warn!("No content retrieved from {}", target);
                return failure_artifact(&target);
            }
            Err(e) => {
                warn!("Failed to render {}: {}", target, e);
                return failure_artifact(&target);
            }
        };

        match classify(&rendered.content, rendered.content_type.as_deref()) {
            ContentKind::Html => {
                debug!("Converting HTML from {} ({} bytes)", target, rendered.content.len());
                ScrapeArtifact {
                    text: self.converter.convert(&rendered.content).await,
                    path: ScrapePath::Markdown,
                }
            }
            ContentKind::Text => {
                debug!("Fencing non-HTML content from {}", target);
                ScrapeArtifact {
                    text: fenced(&rendered.content),
                    path: ScrapePath::Fenced,
                }
            }
        }
    }
}

/// Wrap raw content in a plain code fence
#[must_use]
pub fn fenced(content: &str) -> String {
    format!("```\n{content}\n```")
}

#[must_use]
pub fn failure_artifact(url: &str) -> ScrapeArtifact {
    ScrapeArtifact {
        text: format!("# Failed to retrieve content from {url}"),
        path: ScrapePath::Failed,
    }
}
