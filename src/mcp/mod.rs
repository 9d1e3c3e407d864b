//! MCP protocol front
//!
//! One tool, `scrape_to_markdown`, plus the `scrape://` resources it creates:
//!
//! - `resources/list` and `resources/read` expose every stored scrape
//! - `resources/subscribe` and `resources/unsubscribe` manage per-session
//!   interest in a resource
//! - `notifications/resources/list_changed` goes to every session after a
//!   scrape; `notifications/resources/updated` only to subscribers
//! - `prompts/list` is always empty
//!
//! ```rust,no_run
//! use kodegen_tools_markscrape::{
//!     ChromiumRenderer, HtmlConverter, PeerNotifier, ResourceEventBus, ResourceRegistry,
//!     ScrapeServer, Scraper, ScraperConfig,
//! };
//! use rmcp::ServiceExt;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Arc::new(ScraperConfig::default());
//! let bus = Arc::new(ResourceEventBus::new(config.event_capacity()));
//! let registry = Arc::new(ResourceRegistry::new(bus.clone()));
//! let notifier = PeerNotifier::new();
//! notifier.spawn(bus.subscribe());
//!
//! let scraper = Scraper::new(
//!     Arc::new(ChromiumRenderer::new(config.clone())),
//!     Arc::new(HtmlConverter::new(config.pandoc().clone())),
//! );
//! let service = ScrapeServer::new(registry, scraper, notifier)
//!     .serve(rmcp::transport::stdio())
//!     .await?;
//! service.waiting().await?;
//! # Ok(())
//! # }
//! ```

pub mod notifier;
pub mod server;
pub mod tools;

pub use notifier::{NotificationChannel, PeerNotifier};
pub use server::ScrapeServer;
pub use tools::{ScrapeToMarkdownArgs, scrape_tool};
