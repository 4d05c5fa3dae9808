//! MCP Message Validation
//!
//! JSON schema validation for protocol messages and for tool arguments. Tool
//! arguments are checked against the tool's declared input schema, after
//! schema defaults are filled in, before any handler runs.

use crate::mcp::errors::{McpError, McpResult};
use crate::mcp::protocol::*;
use anyhow::{Result, anyhow};
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// JSON Schema validator for MCP messages
pub struct McpValidator {
    schemas: HashMap<String, Validator>,
}

impl McpValidator {
    /// Create a new MCP validator with built-in schemas
    #[inline]
    pub fn new() -> Result<Self> {
        let mut validator = Self {
            schemas: HashMap::new(),
        };

        validator.load_builtin_schemas()?;

        Ok(validator)
    }

    /// Load built-in JSON schemas for MCP message types
    fn load_builtin_schemas(&mut self) -> Result<()> {
        let request_schema = json!({
            "type": "object",
            "properties": {
                "jsonrpc": {
                    "type": "string",
                    "const": "2.0"
                },
                "method": {"type": "string"},
                "params": {},
                "id": {
                    "oneOf": [
                        {"type": "string"},
                        {"type": "integer"}
                    ]
                }
            },
            "required": ["jsonrpc", "method", "id"]
        });
        self.add_schema("jsonrpc_request", &request_schema)?;

        let notification_schema = json!({
            "type": "object",
            "properties": {
                "jsonrpc": {
                    "type": "string",
                    "const": "2.0"
                },
                "method": {"type": "string"},
                "params": {}
            },
            "required": ["jsonrpc", "method"]
        });
        self.add_schema("jsonrpc_notification", &notification_schema)?;

        let initialize_schema = json!({
            "type": "object",
            "properties": {
                "protocolVersion": {"type": "string"},
                "capabilities": {"type": "object"},
                "clientInfo": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "version": {"type": "string"}
                    },
                    "required": ["name", "version"]
                }
            },
            "required": ["protocolVersion", "capabilities", "clientInfo"]
        });
        self.add_schema("initialize_params", &initialize_schema)?;

        let tool_call_schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "arguments": {"type": "object"}
            },
            "required": ["name"]
        });
        self.add_schema("call_tool_params", &tool_call_schema)?;

        debug!("Loaded {} built-in JSON schemas", self.schemas.len());
        Ok(())
    }

    /// Add a JSON schema to the validator
    #[inline]
    pub fn add_schema(&mut self, name: &str, schema: &Value) -> Result<()> {
        let compiled = compile(schema)
            .map_err(|e| anyhow!("Failed to compile schema '{}': {}", name, e))?;

        self.schemas.insert(name.to_string(), compiled);
        Ok(())
    }

    /// Validate a JSON-RPC request
    #[inline]
    pub fn validate_request(&self, request: &JsonRpcRequest) -> Result<()> {
        let request_value = serde_json::to_value(request)?;
        self.validate_with_schema("jsonrpc_request", &request_value)?;

        if let Some(params) = &request.params {
            self.validate_method_params(&request.method, params)?;
        }

        Ok(())
    }

    /// Validate a JSON-RPC notification
    #[inline]
    pub fn validate_notification(&self, notification: &JsonRpcNotification) -> Result<()> {
        let notification_value = serde_json::to_value(notification)?;
        self.validate_with_schema("jsonrpc_notification", &notification_value)
    }

    /// Validate method-specific parameters
    fn validate_method_params(&self, method: &str, params: &Value) -> Result<()> {
        let schema_name = match method {
            "initialize" => "initialize_params",
            "tools/call" => "call_tool_params",
            _ => {
                debug!("No parameter validation schema for method: {}", method);
                return Ok(());
            }
        };

        self.validate_with_schema(schema_name, params)
    }

    /// Validate a value against a named schema
    #[inline]
    pub fn validate_with_schema(&self, schema_name: &str, value: &Value) -> Result<()> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| anyhow!("Schema '{}' not found", schema_name))?;

        if let Some(message) = collect_errors(schema, value) {
            return Err(anyhow!(
                "Schema validation failed for '{}': {}",
                schema_name,
                message
            ));
        }

        Ok(())
    }

    /// Validate a raw JSON value as an incoming JSON-RPC message
    ///
    /// Responses from the client are accepted as-is; the server never issues
    /// requests so it has nothing to match them against.
    #[inline]
    pub fn validate_raw_message(&self, value: &Value) -> Result<JsonRpcMessage> {
        if let Ok(request) = serde_json::from_value::<JsonRpcRequest>(value.clone()) {
            self.validate_request(&request)?;
            return Ok(JsonRpcMessage::Request(request));
        }

        if let Ok(response) = serde_json::from_value::<JsonRpcResponse>(value.clone()) {
            return Ok(JsonRpcMessage::Response(response));
        }

        if let Ok(error_response) = serde_json::from_value::<JsonRpcErrorResponse>(value.clone()) {
            return Ok(JsonRpcMessage::ErrorResponse(error_response));
        }

        if let Ok(notification) = serde_json::from_value::<JsonRpcNotification>(value.clone()) {
            self.validate_notification(&notification)?;
            return Ok(JsonRpcMessage::Notification(notification));
        }

        Err(McpError::InvalidRequest {
            message: "Value does not match any known JSON-RPC message type".to_string(),
        }
        .into())
    }

    /// Check if a protocol version is supported
    #[inline]
    pub fn is_protocol_version_supported(&self, version: &str) -> bool {
        self.supported_protocol_versions().contains(&version)
    }

    /// Get supported protocol versions, newest first
    #[inline]
    pub fn supported_protocol_versions(&self) -> Vec<&'static str> {
        let mut versions = vec![MCP_VERSION];
        versions.extend(LEGACY_MCP_VERSIONS);
        versions
    }
}

/// Argument validator compiled from a tool's input schema
pub struct ToolInputValidator {
    tool: String,
    defaults: Map<String, Value>,
    /// Declared property names when the schema closes the object
    declared: Option<HashSet<String>>,
    validator: Validator,
}

impl ToolInputValidator {
    /// Compile the input schema of `tool`
    #[inline]
    pub fn new(tool: &Tool) -> McpResult<Self> {
        let validator = compile(&tool.input_schema).map_err(|e| McpError::InvalidToolSchema {
            tool: tool.name.clone(),
            message: e.to_string(),
        })?;

        let defaults = tool.input_schema["properties"]
            .as_object()
            .map(|properties| {
                properties
                    .iter()
                    .filter_map(|(name, property)| {
                        property
                            .get("default")
                            .map(|default| (name.clone(), default.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let declared = (tool.input_schema["additionalProperties"] == Value::Bool(false)).then(|| {
            tool.input_schema["properties"]
                .as_object()
                .map(|properties| properties.keys().cloned().collect())
                .unwrap_or_default()
        });

        Ok(Self {
            tool: tool.name.clone(),
            defaults,
            declared,
            validator,
        })
    }

    /// Drop undeclared keys, fill in schema defaults for absent arguments,
    /// then validate
    ///
    /// Returns the arguments the handler receives.
    #[inline]
    pub fn prepare(&self, arguments: Option<Map<String, Value>>) -> McpResult<Map<String, Value>> {
        let mut arguments = arguments.unwrap_or_default();
        if let Some(declared) = &self.declared {
            arguments.retain(|name, _| {
                let keep = declared.contains(name);
                if !keep {
                    debug!("Dropping undeclared argument {} for {}", name, self.tool);
                }
                keep
            });
        }
        for (name, default) in &self.defaults {
            if !arguments.contains_key(name) {
                arguments.insert(name.clone(), default.clone());
            }
        }

        let value = Value::Object(arguments);
        if let Some(message) = collect_errors(&self.validator, &value) {
            return Err(McpError::InvalidToolParameters {
                tool: self.tool.clone(),
                message,
            });
        }

        match value {
            Value::Object(arguments) => Ok(arguments),
            _ => Err(McpError::InternalError {
                message: format!("arguments for {} are no longer an object", self.tool),
            }),
        }
    }
}

fn compile(schema: &Value) -> Result<Validator, jsonschema::ValidationError<'static>> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(schema)
}

fn collect_errors(validator: &Validator, value: &Value) -> Option<String> {
    if validator.is_valid(value) {
        return None;
    }

    let messages: Vec<String> = validator
        .iter_errors(value)
        .map(|error| error.to_string())
        .collect();
    Some(messages.join("; "))
}
