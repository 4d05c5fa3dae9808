//! MCP (Model Context Protocol) Server Implementation
//!
//! This module provides the MCP server the AgentLink tools are exposed
//! through, following the JSON-RPC 2.0 specification and MCP protocol version
//! 2025-06-18, plus the tool catalog itself.

#[cfg(test)]
mod tests;

pub mod errors;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod validation;

pub use errors::{ErrorHandler, McpError, McpResult};
pub use protocol::{
    CallToolParams, CallToolResult, Implementation, ListToolsResult, Tool, ToolContent,
};
pub use server::{ConnectionState, McpServer, MessageHandler, ToolHandler};
