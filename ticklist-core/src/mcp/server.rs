//! MCP Server Implementation
//!
//! The main server that handles MCP requests and dispatches to tools and resources.

use super::protocol::*;
use super::resources::{ResourceError, ResourceProvider, TodoResourceProvider};
use super::transport::Transport;
use crate::catalog::SharedCatalog;
use crate::config::{ServerConfig, TicklistConfig};
use crate::messages::Messages;
use crate::tools::{todo_registry, Tool, ToolErrorKind, ToolExecutionContext, ToolRegistry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// MCP Server state
pub struct McpServer {
    config: ServerConfig,
    messages: Messages,
    tools: ToolRegistry,
    resources: Vec<Box<dyn ResourceProvider>>,
    initialized: RwLock<bool>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("config", &self.config)
            .field("tools", &self.tools)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl McpServer {
    /// Create a new MCP server builder
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::new()
    }

    /// Create a new MCP server with default config and nothing registered
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Wire a server for a catalog: both TODO tools and the TODO resources.
    pub fn for_catalog(
        config: &TicklistConfig,
        catalog: SharedCatalog,
    ) -> crate::error::Result<Self> {
        let messages = Messages::new(config.server.locale);
        let tools = todo_registry(catalog.clone(), messages)?;
        let resources = TodoResourceProvider::new(catalog, messages)
            .with_scheme(config.catalog.uri_scheme.clone());

        Ok(Self::builder()
            .config(config.server.clone())
            .with_tools(tools)
            .with_resource_provider(Box::new(resources))
            .build())
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Whether a client has completed `initialize`
    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Handle an incoming JSON-RPC message.
    ///
    /// Returns `None` for notifications, which never get a response.
    #[instrument(skip_all, fields(method = %request.method, id = ?request.id))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request).await;
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params).await,
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.handle_tools_list().await,
            "tools/call" => self.handle_tools_call(&id, request.params).await,
            "resources/list" => self.handle_resources_list().await,
            "resources/read" => self.handle_resources_read(request.params).await,
            other => Err(JsonRpcError::method_not_found(format!(
                "Method not found: {}",
                other
            ))),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => {
                debug!(code = err.code, message = %err.message, "Request failed");
                JsonRpcResponse::error(id, err)
            }
        })
    }

    async fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                *self.initialized.write().await = true;
                debug!("Client confirmed initialization");
            }
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    /// Handle initialize request
    async fn handle_initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = parse_params(params, "initialize")?;
        info!(
            client = %params.client_info.name,
            client_version = %params.client_info.version,
            protocol = %params.protocol_version,
            "Client connected"
        );

        let mut capabilities = ServerCapabilities::default();

        if self.config.enable_tools {
            capabilities.tools = Some(ToolsCapability { list_changed: false });
        }

        if self.config.enable_resources {
            capabilities.resources = Some(ResourcesCapability {
                subscribe: false,
                list_changed: false,
            });
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities,
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };

        *self.initialized.write().await = true;

        to_value(result)
    }

    fn ensure_tools_enabled(&self) -> Result<(), JsonRpcError> {
        if self.config.enable_tools {
            Ok(())
        } else {
            Err(JsonRpcError::new(error_codes::DISABLED, "Tools not enabled"))
        }
    }

    fn ensure_resources_enabled(&self) -> Result<(), JsonRpcError> {
        if self.config.enable_resources {
            Ok(())
        } else {
            Err(JsonRpcError::new(error_codes::DISABLED, "Resources not enabled"))
        }
    }

    fn is_allowed(&self, tool_name: &str) -> bool {
        self.config
            .tool_allowlist
            .as_ref()
            .is_none_or(|allowlist| allowlist.iter().any(|name| name == tool_name))
    }

    /// Handle tools/list request
    async fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        self.ensure_tools_enabled()?;

        let tools: Vec<McpTool> = self
            .tools
            .mcp_tools()
            .into_iter()
            .filter(|t| self.is_allowed(&t.name))
            .map(|t| McpTool {
                name: t.name,
                description: t.description,
                input_schema: t.input_schema,
            })
            .collect();

        to_value(ToolsListResult { tools })
    }

    /// Handle tools/call request
    async fn handle_tools_call(
        &self,
        id: &RequestId,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        self.ensure_tools_enabled()?;
        let params: ToolCallParams = parse_params(params, "tool call")?;

        let tool = self.tools.get(&params.name).ok_or_else(|| {
            JsonRpcError::method_not_found(self.messages.unknown_tool(&params.name))
        })?;

        if !self.is_allowed(&params.name) {
            return Err(JsonRpcError::new(
                error_codes::NOT_PERMITTED,
                format!("Tool '{}' not allowed", params.name),
            ));
        }

        let ctx = ToolExecutionContext::new().with_request_id(id.to_string());
        match tool.execute(params.arguments, &ctx).await {
            Ok(output) => {
                info!(tool = %tool.name(), "Tool executed successfully");
                to_value(ToolCallResult {
                    content: vec![ContentBlock::text(output.text)],
                    is_error: None,
                })
            }
            Err(e) => {
                warn!(tool = %tool.name(), error = %e, "Tool execution failed");
                let code = match e.kind {
                    ToolErrorKind::InvalidParams => error_codes::INVALID_PARAMS,
                    ToolErrorKind::NotFound => error_codes::NOT_FOUND,
                    ToolErrorKind::Internal => error_codes::INTERNAL_ERROR,
                };
                Err(JsonRpcError::new(code, e.message)
                    .with_data(serde_json::json!({ "kind": e.kind })))
            }
        }
    }

    /// Handle resources/list request
    async fn handle_resources_list(&self) -> Result<Value, JsonRpcError> {
        self.ensure_resources_enabled()?;

        let mut resources = Vec::new();

        for provider in &self.resources {
            resources.extend(provider.list_resources().await);
        }

        to_value(ResourcesListResult { resources })
    }

    /// Handle resources/read request
    async fn handle_resources_read(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        self.ensure_resources_enabled()?;
        let params: ResourceReadParams = parse_params(params, "resource read")?;

        let provider = self
            .resources
            .iter()
            .find(|p| p.handles(&params.uri))
            .ok_or_else(|| {
                JsonRpcError::invalid_params(format!("Unknown resource URI: {}", params.uri))
            })?;

        match provider.read_resource(&params.uri).await {
            Ok(content) => to_value(ResourceReadResult {
                contents: vec![content],
            }),
            Err(ResourceError::InvalidUri(uri)) => Err(JsonRpcError::invalid_params(format!(
                "Invalid resource URI: {}",
                uri
            ))),
            Err(ResourceError::NotFound(message)) => Err(JsonRpcError::not_found(message)),
        }
    }

    /// Run the server with a transport until the peer closes it
    pub async fn run<T: Transport>(&self, mut transport: T) -> crate::error::Result<()> {
        loop {
            match transport.receive().await {
                Ok(Some(request)) => {
                    if let Some(response) = self.handle_request(request).await {
                        transport.send(response).await?;
                    }
                }
                Ok(None) => {
                    info!("Client closed the connection");
                    break;
                }
                Err(e) => {
                    error!("Transport error: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>, what: &str) -> Result<T, JsonRpcError> {
    let params = params
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing {} params", what)))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid {} params: {}", what, e)))
}

fn to_value<T: Serialize>(result: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

/// Builder for MCP Server
pub struct McpServerBuilder {
    config: ServerConfig,
    tools: ToolRegistry,
    resources: Vec<Box<dyn ResourceProvider>>,
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            tools: ToolRegistry::new(),
            resources: Vec::new(),
        }
    }

    /// Replace the whole server configuration
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    pub fn with_tools(mut self, registry: ToolRegistry) -> Self {
        self.tools = registry;
        self
    }

    pub fn with_resource_provider(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        self.resources.push(provider);
        self
    }

    pub fn with_tool_allowlist(mut self, tools: Vec<String>) -> Self {
        self.config.tool_allowlist = Some(tools);
        self
    }

    pub fn enable_tools(mut self, enable: bool) -> Self {
        self.config.enable_tools = enable;
        self
    }

    pub fn enable_resources(mut self, enable: bool) -> Self {
        self.config.enable_resources = enable;
        self
    }

    pub fn build(self) -> McpServer {
        McpServer {
            messages: Messages::new(self.config.locale),
            config: self.config,
            tools: self.tools,
            resources: self.resources,
            initialized: RwLock::new(false),
        }
    }
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
