//! MCP Server Implementation
//!
//! This module provides the core MCP server framework with connection handling,
//! message routing, and tool-argument validation ahead of dispatch.

use crate::mcp::errors::{ErrorHandler, McpError};
use crate::mcp::protocol::*;
use crate::mcp::validation::{McpValidator, ToolInputValidator};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// MCP Server state and configuration
pub struct McpServer {
    /// Server implementation information
    pub server_info: Implementation,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
    /// Usage hint returned from `initialize`
    pub instructions: Option<String>,
    /// Registered tools, keyed by name
    pub tools: Arc<RwLock<HashMap<String, RegisteredTool>>>,
    /// Connection state
    pub connection_state: Arc<RwLock<ConnectionState>>,
    /// Message validator
    pub validator: Arc<McpValidator>,
}

/// A tool definition together with its argument validator and handler
pub struct RegisteredTool {
    pub tool: Tool,
    input: Arc<ToolInputValidator>,
    handler: Arc<dyn ToolHandler>,
}

/// Connection state tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Initializing,
    Ready,
    Closed,
}

/// Tool handler trait for implementing tool execution
///
/// Handlers only ever see arguments that already passed the tool's input
/// schema, with schema defaults filled in.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult>;
}

/// Message handler for processing incoming messages
pub struct MessageHandler {
    server: Arc<McpServer>,
}

impl McpServer {
    /// Create a new MCP server
    #[inline]
    pub fn new(name: String, version: String) -> Result<Self> {
        let server_info = Implementation { name, version };

        let capabilities = ServerCapabilities {
            experimental: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
        };

        let validator = McpValidator::new()?;

        Ok(Self {
            server_info,
            capabilities,
            instructions: None,
            tools: Arc::new(RwLock::new(HashMap::new())),
            connection_state: Arc::new(RwLock::new(ConnectionState::Uninitialized)),
            validator: Arc::new(validator),
        })
    }

    #[inline]
    #[must_use]
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Register a tool with the server
    ///
    /// Fails if the input schema does not compile or the name is taken.
    #[inline]
    pub async fn register_tool<H>(&self, tool: Tool, handler: H) -> Result<()>
    where
        H: ToolHandler + 'static,
    {
        let tool_name = tool.name.clone();
        let input = ToolInputValidator::new(&tool)?;

        {
            let mut tools = self.tools.write().await;
            if tools.contains_key(&tool_name) {
                return Err(McpError::DuplicateTool { name: tool_name }.into());
            }
            tools.insert(
                tool_name.clone(),
                RegisteredTool {
                    tool,
                    input: Arc::new(input),
                    handler: Arc::new(handler),
                },
            );
        }

        debug!("Registered tool: {}", tool_name);
        Ok(())
    }

    /// Registered tool definitions, sorted by name
    #[inline]
    pub async fn list_tools(&self) -> Vec<Tool> {
        let tools = self.tools.read().await;
        let mut tools_vec: Vec<Tool> = tools.values().map(|entry| entry.tool.clone()).collect();
        tools_vec.sort_by(|a, b| a.name.cmp(&b.name));
        tools_vec
    }

    /// Start the server using stdio transport
    ///
    /// Runs until stdin closes or `shutdown` resolves.
    #[inline]
    pub async fn serve_stdio<F>(self: Arc<Self>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Starting MCP server with stdio transport");

        let reader = BufReader::new(io::stdin());
        let writer = io::stdout();
        self.serve(reader, writer, shutdown).await
    }

    /// Serve newline-delimited JSON-RPC over any reader/writer pair
    #[inline]
    pub async fn serve<R, W, F>(self: Arc<Self>, mut reader: R, mut writer: W, shutdown: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut line = String::new();
        loop {
            line.clear();
            let read = tokio::select! {
                read = reader.read_line(&mut line) => read,
                () = &mut shutdown => {
                    info!("Shutdown requested, closing connection");
                    break;
                }
            };

            match read {
                Ok(0) => {
                    info!("EOF reached, closing connection");
                    break;
                }
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    // First parse as raw JSON
                    let raw_value: Value = match serde_json::from_str(line) {
                        Ok(value) => value,
                        Err(e) => {
                            error!("Failed to parse JSON: {}", e);
                            let error_response =
                                JsonRpcErrorResponse::new(JsonRpcError::parse_error(), None);
                            self.send_message(
                                &mut writer,
                                &JsonRpcMessage::ErrorResponse(error_response),
                            )
                            .await?;
                            continue;
                        }
                    };

                    // Validate and parse as MCP message
                    match self.validator.validate_raw_message(&raw_value) {
                        Ok(message) => {
                            let handler = MessageHandler::new(Arc::clone(&self));
                            if let Err(e) = handler.process_message(message, &mut writer).await {
                                error!("Error processing message: {}", e);
                            }
                        }
                        Err(e) => {
                            error!("Message validation failed: {}", e);
                            let id = raw_value
                                .get("id")
                                .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                            let error_response =
                                JsonRpcErrorResponse::new(JsonRpcError::invalid_request(), id);
                            self.send_message(
                                &mut writer,
                                &JsonRpcMessage::ErrorResponse(error_response),
                            )
                            .await?;
                        }
                    }
                }
                Err(e) => {
                    error!("Error reading from transport: {}", e);
                    break;
                }
            }
        }

        self.close(&mut writer).await
    }

    /// Flush the transport and mark the connection closed
    async fn close<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if let Err(e) = writer.flush().await {
            warn!("Failed to flush transport on close: {}", e);
        }

        {
            let mut state = self.connection_state.write().await;
            *state = ConnectionState::Closed;
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Send a message to the client
    async fn send_message<W>(&self, writer: &mut W, message: &JsonRpcMessage) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let json = serde_json::to_string(message)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Get current connection state
    #[inline]
    pub async fn connection_state(&self) -> ConnectionState {
        self.connection_state.read().await.clone()
    }
}

impl MessageHandler {
    /// Create a new message handler
    #[inline]
    pub fn new(server: Arc<McpServer>) -> Self {
        Self { server }
    }

    /// Process an incoming message
    #[inline]
    pub async fn process_message<W>(&self, message: JsonRpcMessage, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match message {
            JsonRpcMessage::Request(request) => self.handle_request(request, writer).await,
            JsonRpcMessage::Notification(notification) => {
                self.handle_notification(notification).await;
                Ok(())
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::ErrorResponse(_) => {
                warn!("Received unexpected response message from client");
                Ok(())
            }
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request<W>(&self, request: JsonRpcRequest, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let message = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcMessage::Response(JsonRpcResponse::new(result, request.id)),
            Err(e) => {
                debug!("Request {} failed: {}", request.method, e);
                ErrorHandler::handle_error(&e, Some(request.id))
            }
        };

        self.server.send_message(writer, &message).await
    }

    /// Route a request method to its handler
    #[inline]
    pub async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => self.handle_initialize(params).await,
            "tools/list" => self.handle_list_tools().await,
            "tools/call" => self.handle_call_tool(params).await,
            "ping" => Ok(Self::handle_ping()),
            _ => Err(McpError::MethodNotFound {
                method: method.to_string(),
            }
            .into()),
        }
    }

    /// Handle a JSON-RPC notification
    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => self.handle_initialized().await,
            "notifications/cancelled" => {
                debug!("Received cancellation notification");
            }
            _ => {
                warn!("Unknown notification method: {}", notification.method);
            }
        }
    }

    /// Handle initialize request
    #[inline]
    pub async fn handle_initialize(&self, params: Option<Value>) -> Result<Value> {
        let params: InitializeParams = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| McpError::InvalidParameters {
                message: e.to_string(),
            })?,
            None => {
                return Err(McpError::InvalidParameters {
                    message: "Initialize request missing parameters".to_string(),
                }
                .into());
            }
        };

        if !self
            .server
            .validator
            .is_protocol_version_supported(&params.protocol_version)
        {
            let supported = self.server.validator.supported_protocol_versions();
            return Err(McpError::UnsupportedProtocolVersion {
                version: params.protocol_version,
                supported: supported.iter().map(ToString::to_string).collect(),
            }
            .into());
        }

        {
            let mut state = self.server.connection_state.write().await;
            *state = ConnectionState::Initializing;
        }

        // Answer with the client's revision when we speak it
        let result = InitializeResult {
            protocol_version: params.protocol_version,
            capabilities: self.server.capabilities.clone(),
            server_info: self.server.server_info.clone(),
            instructions: self.server.instructions.clone(),
        };

        info!(
            "Client initialized: {} {}",
            params.client_info.name, params.client_info.version
        );
        Ok(serde_json::to_value(result)?)
    }

    /// Handle initialized notification
    async fn handle_initialized(&self) {
        {
            let mut state = self.server.connection_state.write().await;
            *state = ConnectionState::Ready;
        }

        info!("Server ready to handle requests");
    }

    /// Handle list tools request
    #[inline]
    pub async fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.server.list_tools().await,
        };
        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    ///
    /// Arguments are checked against the tool's input schema before the
    /// handler is invoked; violations surface as invalid-params errors.
    #[inline]
    pub async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: CallToolParams = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| McpError::InvalidParameters {
                message: e.to_string(),
            })?,
            None => {
                return Err(McpError::InvalidParameters {
                    message: "Tool call request missing parameters".to_string(),
                }
                .into());
            }
        };

        let (input, handler) = {
            let tools = self.server.tools.read().await;
            let entry = tools.get(&params.name).ok_or_else(|| McpError::ToolNotFound {
                name: params.name.clone(),
            })?;
            (Arc::clone(&entry.input), Arc::clone(&entry.handler))
        };

        let arguments = input.prepare(params.arguments)?;
        debug!("Calling tool {}", params.name);

        let result = handler
            .handle(CallToolParams {
                name: params.name.clone(),
                arguments: Some(arguments),
            })
            .await
            .map_err(|e| McpError::ToolExecutionFailed {
                tool: params.name,
                message: format!("{:#}", e),
            })?;
        Ok(serde_json::to_value(result)?)
    }

    /// Handle ping request
    #[inline]
    pub fn handle_ping() -> Value {
        serde_json::json!({})
    }
}
