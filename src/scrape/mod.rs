//! Scrape orchestration

pub mod classify;
pub mod orchestrator;

pub use classify::{ContentKind, classify, is_html_content_type, looks_like_html};
pub use orchestrator::{ScrapeArtifact, ScrapePath, Scraper, failure_artifact, fenced};
