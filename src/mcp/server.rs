//! MCP request handling for the scrape server
//!
//! `ScrapeServer` is the protocol front: it maps resource, tool and prompt
//! requests onto the orchestrator and the registry. The request logic lives
//! in inherent methods that need no request context, and the `ServerHandler`
//! impl only adapts them to rmcp's signatures.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    AnnotateAble, CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam,
    GetPromptResult, Implementation, JsonObject, ListPromptsResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
    ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo, SubscribeRequestParam,
    Tool, UnsubscribeRequestParam,
};
use rmcp::service::{NotificationContext, RequestContext};
use rmcp::RoleServer;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::notifier::PeerNotifier;
use super::tools::{ScrapeToMarkdownArgs, scrape_tool};
use crate::resources::{RegistryError, ResourceRegistry, ResourceUri, SubscriberId};
use crate::scrape::Scraper;
use crate::utils::{MARKDOWN_MIME_TYPE, SCRAPE_TOOL_NAME};

const SERVER_INSTRUCTIONS: &str = "Use scrape_to_markdown to fetch a web page and convert it to \
markdown. Every scrape is stored as a scrape:// resource that can be listed, read and \
subscribed to for the rest of the session.";

/// Protocol front for one client connection
///
/// Clones share the registry, the scraper and the notifier, and keep the
/// same session identity.
#[derive(Debug, Clone)]
pub struct ScrapeServer {
    registry: Arc<ResourceRegistry>,
    scraper: Scraper,
    notifier: PeerNotifier,
    session: SubscriberId,
}

impl ScrapeServer {
    #[must_use]
    pub fn new(registry: Arc<ResourceRegistry>, scraper: Scraper, notifier: PeerNotifier) -> Self {
        Self {
            registry,
            scraper,
            notifier,
            session: SubscriberId::generate(),
        }
    }

    /// Subscriber token this connection uses with the registry
    #[must_use]
    pub fn session(&self) -> &SubscriberId {
        &self.session
    }

    /// Stop pushing notifications to this connection
    pub fn disconnect(&self) {
        self.notifier.unregister(&self.session);
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Every stored resource as an MCP resource descriptor
    #[must_use]
    pub fn resource_descriptors(&self) -> Vec<rmcp::model::Resource> {
        self.registry
            .list()
            .into_iter()
            .map(|summary| {
                let mut raw = RawResource::new(summary.uri.as_str(), summary.name);
                raw.description = Some(summary.description);
                raw.mime_type = Some(summary.mime_type);
                raw.no_annotation()
            })
            .collect()
    }

    /// Content of one resource
    ///
    /// # Errors
    ///
    /// `resource_not_found` for a foreign scheme or an identity never issued.
    pub fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let resource = ResourceUri::parse(uri)
            .and_then(|parsed| self.registry.get(&parsed))
            .map_err(|e| {
                debug!("Read of {} failed: {}", uri, e);
                not_found(e)
            })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(resource.content, uri)],
        })
    }

    /// Subscribe this session to updates of `uri`
    ///
    /// # Errors
    ///
    /// `invalid_params` when the resource does not exist.
    pub fn subscribe_session(&self, uri: &str) -> Result<(), McpError> {
        ResourceUri::parse(uri)
            .and_then(|parsed| self.registry.subscribe(&parsed, &self.session))
            .map_err(|e| {
                debug!("Subscribe to {} failed: {}", uri, e);
                McpError::invalid_params(format!("Cannot subscribe to resource: {uri}"), None)
            })
    }

    /// Drop this session's subscription to `uri`
    ///
    /// # Errors
    ///
    /// `invalid_params` when nobody is subscribed to `uri`.
    pub fn unsubscribe_session(&self, uri: &str) -> Result<(), McpError> {
        ResourceUri::parse(uri)
            .and_then(|parsed| self.registry.unsubscribe(&parsed, &self.session))
            .map_err(|e| {
                debug!("Unsubscribe from {} failed: {}", uri, e);
                McpError::invalid_params(format!("Cannot unsubscribe from resource: {uri}"), None)
            })
    }

    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        vec![scrape_tool()]
    }

    /// Dispatch a tool call
    ///
    /// Scrape failures are not errors: they come back as a failure notice and
    /// are stored like any other result.
    ///
    /// # Errors
    ///
    /// `invalid_params` for an unknown tool or a missing `url`.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, McpError> {
        if name != SCRAPE_TOOL_NAME {
            warn!("Unknown tool requested: {}", name);
            return Err(McpError::invalid_params(format!("Unknown tool: {name}"), None));
        }

        let args = ScrapeToMarkdownArgs::from_arguments(arguments)?;
        let artifact = self.scraper.scrape(args.url(), args.render_options()).await;

        let uri = self
            .registry
            .add(args.url(), artifact.text.clone(), MARKDOWN_MIME_TYPE);
        info!("Stored {} as {} ({:?})", args.url(), uri, artifact.path);

        Ok(CallToolResult::success(vec![Content::text(artifact.text)]))
    }

    /// No prompts are offered
    ///
    /// # Errors
    ///
    /// Always: `invalid_params` naming the unknown prompt.
    pub fn prompt(&self, name: &str) -> Result<GetPromptResult, McpError> {
        Err(McpError::invalid_params(format!("Unknown prompt: {name}"), None))
    }
}

fn not_found(error: RegistryError) -> McpError {
    McpError::resource_not_found(error.to_string(), None)
}

fn server_implementation() -> Implementation {
    Implementation {
        name: env!("CARGO_PKG_NAME").into(),
        version: env!("CARGO_PKG_VERSION").into(),
        ..Implementation::default()
    }
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities::builder()
        .enable_tools()
        .enable_prompts()
        .enable_resources()
        .enable_resources_subscribe()
        .enable_resources_list_changed()
        .build()
}

impl ServerHandler for ScrapeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: server_capabilities(),
            server_info: server_implementation(),
            instructions: Some(SERVER_INSTRUCTIONS.into()),
        }
    }

    async fn on_initialized(&self, context: NotificationContext<RoleServer>) {
        self.notifier.register(self.session.clone(), context.peer);
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.resource_descriptors(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri)
    }

    async fn subscribe(
        &self,
        request: SubscribeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), McpError> {
        self.subscribe_session(&request.uri)
    }

    async fn unsubscribe(
        &self,
        request: UnsubscribeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), McpError> {
        self.unsubscribe_session(&request.uri)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            prompts: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&request.name)
    }
}
