pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod converter;
pub mod mcp;
pub mod renderer;
pub mod resources;
pub mod scrape;
pub mod utils;

pub use browser_setup::{LaunchOptions, download_managed_browser, find_browser_executable, launch_browser};
pub use config::{PandocConfig, ScraperConfig, ScraperConfigBuilder};
pub use converter::{ConvertError, HtmlConverter, MarkdownConverter, PandocConverter};
pub use mcp::{PeerNotifier, ScrapeServer, ScrapeToMarkdownArgs};
pub use renderer::{ChromiumRenderer, ContentRenderer, RenderError, RenderOptions, RenderedContent};
pub use resources::{
    RegistryError, Resource, ResourceEvent, ResourceEventBus, ResourceEventSink, ResourceRegistry,
    ResourceSummary, ResourceUri, SubscriberId,
};
pub use scrape::{ScrapeArtifact, ScrapePath, Scraper};
pub use utils::normalize_url;
