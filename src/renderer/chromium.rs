//! Headless Chrome renderer
//!
//! One browser per call: launch, open a blank page, fix up the user agent,
//! navigate with a timeout, read the document, tear everything down.

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::timeout::with_page_timeout;
use super::{ContentRenderer, RenderError, RenderOptions, RenderedContent, bare_mime_type, with_browser};
use crate::browser_setup::LaunchOptions;
use crate::config::ScraperConfig;
use crate::utils::is_valid_url;

/// Returns the document's text for non-HTML documents, which Chrome wraps in
/// a synthetic `<pre>` page.
const DOCUMENT_TEXT_JS: &str =
    "document.body ? document.body.innerText : (document.documentElement ? document.documentElement.textContent : '')";

/// Renderer backed by chromiumoxide
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: Arc<ScraperConfig>,
}

impl ChromiumRenderer {
    #[must_use]
    pub fn new(config: Arc<ScraperConfig>) -> Self {
        Self { config }
    }

    fn launch_options(&self, options: RenderOptions) -> LaunchOptions {
        LaunchOptions {
            headless: self.config.headless(),
            ignore_certificate_errors: !options.verify_ssl,
            chrome_executable: self.config.chrome_executable().map(ToOwned::to_owned),
            request_timeout: self.config.navigation_timeout(),
        }
    }
}

#[async_trait]
impl ContentRenderer for ChromiumRenderer {
    async fn render(
        &self,
        url: &str,
        options: RenderOptions,
    ) -> Result<RenderedContent, RenderError> {
        // Reject garbage before paying for a browser launch
        if !is_valid_url(url) {
            return Err(RenderError::InvalidUrl {
                url: url.to_string(),
            });
        }

        info!("Rendering {} (verify_ssl={})", url, options.verify_ssl);

        let launch = self.launch_options(options);
        let url = url.to_string();
        let navigation_timeout = self.config.navigation_timeout();
        let user_agent_suffix = self.config.user_agent_suffix().to_string();

        with_browser(&launch, move |browser| {
            Box::pin(fetch_page(browser, url, navigation_timeout, user_agent_suffix))
        })
        .await
    }
}

async fn fetch_page(
    browser: &Browser,
    url: String,
    navigation_timeout: Duration,
    user_agent_suffix: String,
) -> Result<RenderedContent, RenderError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| RenderError::Launch(format!("Failed to create page: {e}")))?;

    if let Err(e) = apply_user_agent(&page, &user_agent_suffix).await {
        warn!("Failed to override user agent for {}: {}", url, e);
    }

    with_page_timeout(
        async {
            page.goto(url.as_str())
                .await
                .map_err(|e| RenderError::Navigation {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            page.wait_for_navigation()
                .await
                .map_err(|e| RenderError::Navigation {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            Ok(())
        },
        navigation_timeout,
        "Page navigation",
    )
    .await?;

    let result = read_document(&page).await;

    if let Err(e) = page.close().await {
        debug!("Failed to close page for {}: {}", url, e);
    }

    result
}

/// Read the document and its MIME type from a loaded page
async fn read_document(page: &Page) -> Result<RenderedContent, RenderError> {
    let content_type = match page.evaluate("document.contentType").await {
        Ok(value) => value
            .into_value::<String>()
            .ok()
            .and_then(|ct| bare_mime_type(&ct)),
        Err(e) => {
            debug!("Could not read document.contentType: {}", e);
            None
        }
    };

    let is_html = content_type
        .as_deref()
        .is_none_or(|ct| ct == "text/html" || ct == "application/xhtml+xml");

    let content = if is_html {
        page.content()
            .await
            .map_err(|e| RenderError::Extraction(e.to_string()))?
    } else {
        page.evaluate(DOCUMENT_TEXT_JS)
            .await
            .map_err(|e| RenderError::Extraction(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| RenderError::Extraction(e.to_string()))?
    };

    Ok(RenderedContent {
        content,
        content_type,
    })
}

/// Drop the "Headless" marker from the browser's own user agent and tag it
/// with our suffix
async fn apply_user_agent(page: &Page, suffix: &str) -> Result<(), RenderError> {
    let current: String = page
        .evaluate("navigator.userAgent")
        .await
        .map_err(|e| RenderError::Extraction(e.to_string()))?
        .into_value()
        .map_err(|e| RenderError::Extraction(e.to_string()))?;

    let user_agent = compose_user_agent(&current, suffix);
    debug!("Using user agent: {}", user_agent);

    page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
        .await
        .map_err(|e| RenderError::Extraction(e.to_string()))?;
    Ok(())
}

fn compose_user_agent(browser_agent: &str, suffix: &str) -> String {
    let cleaned = browser_agent.replace("Headless", "").replace("headless", "");
    if suffix.is_empty() {
        cleaned
    } else {
        format!("{cleaned} {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_marker_is_stripped() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/132.0.0.0 Safari/537.36";
        let composed = compose_user_agent(ua, "kodegen-markscrape/1.0");
        assert!(!composed.contains("Headless"));
        assert!(composed.contains("Chrome/132.0.0.0"));
        assert!(composed.ends_with(" kodegen-markscrape/1.0"));
    }

    #[test]
    fn empty_suffix_adds_nothing() {
        assert_eq!(compose_user_agent("Agent headless", ""), "Agent ");
    }

    #[test]
    fn certificate_flag_follows_verify_ssl() {
        let renderer = ChromiumRenderer::new(Arc::new(ScraperConfig::default()));
        assert!(!renderer.launch_options(RenderOptions { verify_ssl: true }).ignore_certificate_errors);
        assert!(renderer.launch_options(RenderOptions { verify_ssl: false }).ignore_certificate_errors);
    }

    #[tokio::test]
    async fn invalid_url_fails_without_launching() {
        let renderer = ChromiumRenderer::new(Arc::new(ScraperConfig::default()));
        let result = renderer
            .render("https://", RenderOptions::default())
            .await;
        assert!(matches!(result, Err(RenderError::InvalidUrl { .. })));
    }
}
