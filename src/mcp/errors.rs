//! MCP Error Handling
//!
//! Error classification for the protocol layer and its mapping onto JSON-RPC
//! error objects.

use crate::mcp::protocol::*;
use thiserror::Error;
use tracing::{error, warn};

/// MCP-specific errors that can occur during server operation
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Protocol version not supported: {version}. Supported versions: {supported:?}")]
    UnsupportedProtocolVersion {
        version: String,
        supported: Vec<String>,
    },

    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },

    #[error("Invalid tool parameters for {tool}: {message}")]
    InvalidToolParameters { tool: String, message: String },

    #[error("Invalid input schema for {tool}: {message}")]
    InvalidToolSchema { tool: String, message: String },

    #[error("Tool execution failed for {tool}: {message}")]
    ToolExecutionFailed { tool: String, message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },

    #[error("JSON-RPC parse error: {message}")]
    ParseError { message: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },
}

impl McpError {
    /// Convert MCP error to JSON-RPC error
    #[inline]
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        match self {
            Self::UnsupportedProtocolVersion { version, supported } => JsonRpcError::new(
                mcp_error_codes::INVALID_PROTOCOL_VERSION,
                format!(
                    "Unsupported protocol version: {}. Supported: {}",
                    version,
                    supported.join(", ")
                ),
                None,
            ),
            Self::ToolNotFound { name } => JsonRpcError::new(
                mcp_error_codes::TOOL_NOT_FOUND,
                format!("Tool not found: {}", name),
                None,
            ),
            Self::InvalidToolParameters { tool, message } => JsonRpcError::new(
                error_codes::INVALID_PARAMS,
                format!("Invalid parameters for tool '{}': {}", tool, message),
                None,
            ),
            Self::DuplicateTool { .. }
            | Self::InvalidToolSchema { .. }
            | Self::InternalError { .. } => {
                JsonRpcError::new(error_codes::INTERNAL_ERROR, self.to_string(), None)
            }
            Self::ToolExecutionFailed { tool, message } => JsonRpcError::new(
                error_codes::INTERNAL_ERROR,
                format!("Tool '{}' execution failed: {}", tool, message),
                None,
            ),
            Self::InvalidRequest { message } => {
                JsonRpcError::new(error_codes::INVALID_REQUEST, message.clone(), None)
            }
            Self::ParseError { message } => {
                JsonRpcError::new(error_codes::PARSE_ERROR, message.clone(), None)
            }
            Self::MethodNotFound { method } => JsonRpcError::method_not_found(method),
            Self::InvalidParameters { message } => {
                JsonRpcError::new(error_codes::INVALID_PARAMS, message.clone(), None)
            }
        }
    }

    /// Create error response message
    #[inline]
    pub fn to_error_response(&self, id: Option<RequestId>) -> JsonRpcMessage {
        let error = self.to_jsonrpc_error();
        let error_response = JsonRpcErrorResponse::new(error, id);
        JsonRpcMessage::ErrorResponse(error_response)
    }

    /// Log the error with appropriate level
    #[inline]
    pub fn log(&self) {
        match self {
            // Caller mistakes; the server itself is fine
            Self::ParseError { .. }
            | Self::InvalidRequest { .. }
            | Self::InvalidParameters { .. }
            | Self::InvalidToolParameters { .. }
            | Self::MethodNotFound { .. }
            | Self::ToolNotFound { .. }
            | Self::UnsupportedProtocolVersion { .. } => {
                warn!("Client error: {}", self);
            }
            Self::ToolExecutionFailed { .. } | Self::InternalError { .. } => {
                error!("Server error: {}", self);
            }
            Self::DuplicateTool { .. } | Self::InvalidToolSchema { .. } => {
                error!("MCP error: {}", self);
            }
        }
    }
}

/// Error handler utility for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    /// Handle any error and convert to appropriate JSON-RPC response
    #[inline]
    pub fn handle_error(error: &anyhow::Error, id: Option<RequestId>) -> JsonRpcMessage {
        // Try to downcast to MCP error first
        if let Some(mcp_error) = error.downcast_ref::<McpError>() {
            mcp_error.log();
            return mcp_error.to_error_response(id);
        }

        error!("Unexpected error: {:#}", error);
        let internal_error = McpError::InternalError {
            message: format!("{:#}", error),
        };
        internal_error.to_error_response(id)
    }
}

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Convert from serde_json::Error to McpError
impl From<serde_json::Error> for McpError {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        Self::ParseError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn tool_not_found_error() {
        let error = McpError::ToolNotFound {
            name: "test_tool".to_string(),
        };

        let jsonrpc_error = error.to_jsonrpc_error();
        assert_eq!(jsonrpc_error.code, mcp_error_codes::TOOL_NOT_FOUND);
        assert!(jsonrpc_error.message.contains("test_tool"));
    }

    #[test]
    fn invalid_protocol_version_error() {
        let error = McpError::UnsupportedProtocolVersion {
            version: "invalid".to_string(),
            supported: vec!["2025-06-18".to_string()],
        };

        let jsonrpc_error = error.to_jsonrpc_error();
        assert_eq!(
            jsonrpc_error.code,
            mcp_error_codes::INVALID_PROTOCOL_VERSION
        );
        assert!(jsonrpc_error.message.contains("invalid"));
        assert!(jsonrpc_error.message.contains("2025-06-18"));
    }

    #[test]
    fn invalid_tool_parameters_map_to_invalid_params() {
        let error = McpError::InvalidToolParameters {
            tool: "get_vat_data".to_string(),
            message: "5 is greater than the maximum of 4".to_string(),
        };

        let jsonrpc_error = error.to_jsonrpc_error();
        assert_eq!(jsonrpc_error.code, error_codes::INVALID_PARAMS);
        assert!(jsonrpc_error.message.contains("get_vat_data"));
    }

    #[test]
    fn error_response_creation() {
        let error = McpError::InternalError {
            message: "test error".to_string(),
        };

        let response = error.to_error_response(Some(RequestId::String("test".to_string())));

        if let JsonRpcMessage::ErrorResponse(err_resp) = response {
            assert_eq!(err_resp.error.code, error_codes::INTERNAL_ERROR);
            assert!(err_resp.error.message.contains("test error"));
        } else {
            panic!("Expected error response");
        }
    }

    #[test]
    fn handle_error_downcasts_mcp_errors() {
        let error = anyhow::Error::new(McpError::MethodNotFound {
            method: "resources/list".to_string(),
        });

        let response = ErrorHandler::handle_error(&error, Some(RequestId::Number(7)));

        if let JsonRpcMessage::ErrorResponse(err_resp) = response {
            assert_eq!(err_resp.error.code, error_codes::METHOD_NOT_FOUND);
            assert_eq!(err_resp.id, Some(RequestId::Number(7)));
        } else {
            panic!("Expected error response");
        }
    }

    #[test]
    fn handle_error_falls_back_to_internal_error() {
        let error = anyhow!("disk on fire");

        let response = ErrorHandler::handle_error(&error, None);

        if let JsonRpcMessage::ErrorResponse(err_resp) = response {
            assert_eq!(err_resp.error.code, error_codes::INTERNAL_ERROR);
            assert!(err_resp.error.message.contains("disk on fire"));
        } else {
            panic!("Expected error response");
        }
    }
}
