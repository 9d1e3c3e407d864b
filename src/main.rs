// Category stdio Server: Markscrape Tools
//
// This binary serves the scrape_to_markdown tool and its scrape:// resources
// over MCP stdio transport. stdout carries the protocol; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use kodegen_tools_markscrape::{
    ChromiumRenderer, HtmlConverter, PeerNotifier, ResourceEventBus, ResourceRegistry,
    ScrapeServer, Scraper, ScraperConfig,
};
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line arguments, each with an environment fallback
#[derive(Parser, Debug)]
#[command(name = "kodegen-markscrape")]
#[command(version, about = "MCP server that scrapes web pages into markdown resources")]
struct Args {
    /// Seconds allowed for page navigation before the scrape counts as failed
    #[arg(long, env = "MARKSCRAPE_NAVIGATION_TIMEOUT", default_value_t = 30)]
    navigation_timeout: u64,

    /// Show the browser window
    #[arg(long, env = "MARKSCRAPE_HEADED")]
    headed: bool,

    /// Chrome or Chromium executable to use instead of discovery
    #[arg(long, env = "MARKSCRAPE_CHROME", value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Text appended to the browser's user agent
    #[arg(long, env = "MARKSCRAPE_USER_AGENT_SUFFIX")]
    user_agent_suffix: Option<String>,

    /// Never use pandoc, even if installed
    #[arg(long, env = "MARKSCRAPE_NO_PANDOC")]
    no_pandoc: bool,

    /// pandoc executable to use instead of looking it up on PATH
    #[arg(long, env = "MARKSCRAPE_PANDOC", value_name = "PATH")]
    pandoc: Option<PathBuf>,

    /// Seconds allowed for one pandoc conversion
    #[arg(long, env = "MARKSCRAPE_PANDOC_TIMEOUT", default_value_t = 60)]
    pandoc_timeout: u64,

    /// Shell command run once to install pandoc when it is missing
    #[arg(long, env = "MARKSCRAPE_PANDOC_INSTALL", value_name = "COMMAND")]
    pandoc_install: Option<String>,

    /// Buffered resource events per notification consumer
    #[arg(long, env = "MARKSCRAPE_EVENT_CAPACITY", default_value_t = 256)]
    event_capacity: usize,
}

impl Args {
    fn into_config(self) -> Result<ScraperConfig> {
        let mut builder = ScraperConfig::builder()
            .navigation_timeout_secs(self.navigation_timeout)
            .headless(!self.headed)
            .chrome_executable(self.chrome)
            .pandoc_enabled(!self.no_pandoc)
            .pandoc_executable(self.pandoc)
            .pandoc_timeout_secs(self.pandoc_timeout)
            .pandoc_install_command(self.pandoc_install)
            .event_capacity(self.event_capacity);
        if let Some(suffix) = self.user_agent_suffix {
            builder = builder.user_agent_suffix(suffix);
        }
        builder.build()
    }
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing();

    let config = Arc::new(args.into_config().context("Invalid configuration")?);
    info!("Starting kodegen-markscrape {}", env!("CARGO_PKG_VERSION"));

    let bus = Arc::new(ResourceEventBus::new(config.event_capacity()));
    let registry = Arc::new(ResourceRegistry::new(bus.clone()));
    let notifier = PeerNotifier::new();
    let notifier_task = notifier.spawn(bus.subscribe());

    let scraper = Scraper::new(
        Arc::new(ChromiumRenderer::new(config.clone())),
        Arc::new(HtmlConverter::new(config.pandoc().clone())),
    );
    let server = ScrapeServer::new(registry.clone(), scraper, notifier);
    let session = server.clone();

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP stdio service")?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(reason) => info!("MCP session ended: {:?}", reason),
                Err(e) => warn!("MCP session task failed: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    session.disconnect();
    registry.cleanup();
    notifier_task.abort();
    info!("Resources cleaned up");

    Ok(())
}
