//! `scrape_to_markdown` tool descriptor and arguments

use rmcp::ErrorData as McpError;
use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::renderer::RenderOptions;
use crate::utils::SCRAPE_TOOL_NAME;

const SCRAPE_TOOL_DESCRIPTION: &str = "Scrape a URL and convert the content to markdown";

/// Arguments accepted by `scrape_to_markdown`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapeToMarkdownArgs {
    /// Page to scrape; a missing scheme becomes `https://`
    #[serde(default)]
    pub url: Option<String>,

    /// Reject invalid TLS certificates
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_verify_ssl() -> bool {
    true
}

impl ScrapeToMarkdownArgs {
    /// Decode raw call arguments
    ///
    /// # Errors
    ///
    /// `invalid_params` when the arguments have the wrong shape or `url` is
    /// missing or blank.
    pub fn from_arguments(arguments: Option<JsonObject>) -> Result<Self, McpError> {
        let args: Self = serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))?;

        if args.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
            return Err(McpError::invalid_params("URL is required", None));
        }
        Ok(args)
    }

    /// The validated URL; empty only if constructed by hand
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            verify_ssl: self.verify_ssl,
        }
    }
}

fn input_schema() -> JsonObject {
    let schema = json!({
        "type": "object",
        "properties": {
            "url": {
                "type": "string",
                "description": "URL to scrape"
            },
            "verify_ssl": {
                "type": "boolean",
                "description": "Whether to verify SSL certificates (default: true)",
                "default": true
            }
        },
        "required": ["url"]
    });

    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

/// The single tool this server exposes
#[must_use]
pub fn scrape_tool() -> Tool {
    Tool::new(SCRAPE_TOOL_NAME, SCRAPE_TOOL_DESCRIPTION, Arc::new(input_schema()))
}
