//! Test doubles and helpers for the markscrape test suite
//!
//! Nothing here launches a browser, touches the network or runs pandoc.

use async_trait::async_trait;
use kodegen_tools_markscrape::{
    ContentRenderer, MarkdownConverter, PeerNotifier, RenderError, RenderOptions, RenderedContent,
    ResourceRegistry, ScrapeServer, Scraper,
};
use parking_lot::Mutex;
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::Value;
use std::sync::Arc;

/// What the fake renderer answers
#[derive(Debug, Clone)]
enum Reply {
    Page {
        content: String,
        content_type: Option<String>,
    },
    Fail,
}

/// Renderer that records every call and answers with a canned reply
#[derive(Debug)]
pub struct FakeRenderer {
    reply: Reply,
    calls: Mutex<Vec<(String, RenderOptions)>>,
}

#[allow(dead_code)]
impl FakeRenderer {
    pub fn page(content: &str, content_type: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Page {
                content: content.to_string(),
                content_type: content_type.map(str::to_string),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn options(&self) -> Vec<RenderOptions> {
        self.calls.lock().iter().map(|(_, options)| *options).collect()
    }
}

#[async_trait]
impl ContentRenderer for FakeRenderer {
    async fn render(
        &self,
        url: &str,
        options: RenderOptions,
    ) -> Result<RenderedContent, RenderError> {
        self.calls.lock().push((url.to_string(), options));
        match &self.reply {
            Reply::Page {
                content,
                content_type,
            } => Ok(RenderedContent {
                content: content.clone(),
                content_type: content_type.clone(),
            }),
            Reply::Fail => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            }),
        }
    }
}

/// Converter that tags its input so tests can tell it ran
#[derive(Debug, Default)]
pub struct FakeConverter;

#[async_trait]
impl MarkdownConverter for FakeConverter {
    async fn convert(&self, html: &str) -> String {
        format!("MARKDOWN({} bytes)", html.len())
    }
}

/// A server wired to `renderer`, the fake converter and a detached registry
#[allow(dead_code)]
pub fn server_with(renderer: Arc<FakeRenderer>) -> ScrapeServer {
    let registry = Arc::new(ResourceRegistry::detached());
    let scraper = Scraper::new(renderer, Arc::new(FakeConverter));
    ScrapeServer::new(registry, scraper, PeerNotifier::new())
}

#[allow(dead_code)]
pub fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Text of the first content item of a tool result
#[allow(dead_code)]
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}
