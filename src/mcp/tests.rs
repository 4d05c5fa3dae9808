//! MCP Protocol Implementation Tests
//!
//! Unit tests for the MCP server: the initialize handshake, request routing,
//! tool registration and argument checking ahead of dispatch.

#[cfg(test)]
mod server_tests {
    use crate::mcp::protocol::{LEGACY_MCP_VERSIONS, MCP_VERSION};
    use crate::mcp::{
        CallToolParams, CallToolResult, ConnectionState, McpError, McpServer, MessageHandler,
        Tool, ToolContent, ToolHandler,
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes its arguments back and counts invocations
    struct EchoHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ToolHandler for EchoHandler {
        async fn handle(&self, params: CallToolParams) -> anyhow::Result<CallToolResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let arguments = Value::Object(params.arguments.unwrap_or_default());
            Ok(CallToolResult {
                content: vec![ToolContent::text(arguments.to_string())],
                is_error: None,
            })
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn handle(&self, _params: CallToolParams) -> anyhow::Result<CallToolResult> {
            Err(anyhow::anyhow!("backend exploded"))
        }
    }

    fn echo_tool(name: &str) -> Tool {
        Tool {
            name: name.to_string(),
            description: Some("Echo arguments".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "count": { "type": "integer", "minimum": 1, "maximum": 4 },
                    "mode": { "type": "string", "enum": ["fast", "slow"], "default": "fast" }
                },
                "required": ["count"],
                "additionalProperties": false
            }),
        }
    }

    async fn server_with_echo() -> (Arc<McpServer>, Arc<AtomicUsize>) {
        let server = McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
            .expect("server should build");
        let calls = Arc::new(AtomicUsize::new(0));
        server
            .register_tool(
                echo_tool("echo"),
                EchoHandler {
                    calls: Arc::clone(&calls),
                },
            )
            .await
            .expect("tool should register");
        (Arc::new(server), calls)
    }

    fn initialize_params(version: &str) -> Value {
        json!({
            "protocolVersion": version,
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0.0" }
        })
    }

    #[tokio::test]
    async fn initialize_reports_identity_and_version() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(Arc::clone(&server));

        let result = handler
            .dispatch("initialize", Some(initialize_params(MCP_VERSION)))
            .await
            .expect("initialize should succeed");

        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "agentlink-test");
        assert_eq!(result["serverInfo"]["version"], "0.0.1");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(server.connection_state().await, ConnectionState::Initializing);
    }

    #[tokio::test]
    async fn initialize_echoes_legacy_versions() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        for version in LEGACY_MCP_VERSIONS {
            let result = handler
                .dispatch("initialize", Some(initialize_params(version)))
                .await
                .expect("legacy version should be accepted");
            assert_eq!(result["protocolVersion"], version);
        }
    }

    #[tokio::test]
    async fn initialize_rejects_unknown_version() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let error = handler
            .dispatch("initialize", Some(initialize_params("1999-01-01")))
            .await
            .expect_err("unknown version should be rejected");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::UnsupportedProtocolVersion { .. })
        ));
    }

    #[tokio::test]
    async fn initialize_without_params_is_invalid() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let error = handler
            .dispatch("initialize", None)
            .await
            .expect_err("missing params should be rejected");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::InvalidParameters { .. })
        ));
    }

    #[tokio::test]
    async fn ping_returns_empty_object() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let result = handler.dispatch("ping", None).await.expect("ping");
        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn unknown_method_is_not_found() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let error = handler
            .dispatch("resources/list", None)
            .await
            .expect_err("resources are not served");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::MethodNotFound { method }) if method == "resources/list"
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let (server, calls) = server_with_echo().await;

        let error = server
            .register_tool(echo_tool("echo"), EchoHandler { calls })
            .await
            .expect_err("second registration should fail");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::DuplicateTool { name }) if name == "echo"
        ));
        assert_eq!(server.list_tools().await.len(), 1);
    }

    #[tokio::test]
    async fn list_tools_is_sorted_by_name() {
        let server = McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
            .expect("server should build");
        let calls = Arc::new(AtomicUsize::new(0));
        for name in ["zeta", "alpha", "mid"] {
            server
                .register_tool(
                    echo_tool(name),
                    EchoHandler {
                        calls: Arc::clone(&calls),
                    },
                )
                .await
                .expect("tool should register");
        }

        let handler = MessageHandler::new(Arc::new(server));
        let result = handler.dispatch("tools/list", None).await.expect("list");
        let names: Vec<&str> = result["tools"]
            .as_array()
            .expect("tools array")
            .iter()
            .filter_map(|tool| tool["name"].as_str())
            .collect();

        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn call_fills_defaults_before_handler() {
        let (server, calls) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let result = handler
            .dispatch(
                "tools/call",
                Some(json!({ "name": "echo", "arguments": { "count": 2 } })),
            )
            .await
            .expect("valid call");

        let text = result["content"][0]["text"].as_str().expect("text content");
        let echoed: Value = serde_json::from_str(text).expect("echo is json");
        assert_eq!(echoed, json!({ "count": 2, "mode": "fast" }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn call_drops_undeclared_arguments() {
        let (server, calls) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let result = handler
            .dispatch(
                "tools/call",
                Some(json!({ "name": "echo", "arguments": { "count": 1, "extra": true } })),
            )
            .await
            .expect("undeclared keys are stripped, not rejected");

        let text = result["content"][0]["text"].as_str().expect("text content");
        let echoed: Value = serde_json::from_str(text).expect("echo is json");
        assert_eq!(echoed, json!({ "count": 1, "mode": "fast" }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_handler() {
        let (server, calls) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        for arguments in [
            json!({ "count": 5 }),
            json!({ "count": 1, "mode": "warp" }),
            json!({}),
        ] {
            let error = handler
                .dispatch(
                    "tools/call",
                    Some(json!({ "name": "echo", "arguments": arguments })),
                )
                .await
                .expect_err("invalid arguments should be rejected");

            assert!(matches!(
                error.downcast_ref::<McpError>(),
                Some(McpError::InvalidToolParameters { .. })
            ));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let (server, _) = server_with_echo().await;
        let handler = MessageHandler::new(server);

        let error = handler
            .dispatch("tools/call", Some(json!({ "name": "missing" })))
            .await
            .expect_err("unknown tool");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::ToolNotFound { name }) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn handler_failure_is_execution_error() {
        let server = McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
            .expect("server should build");
        server
            .register_tool(echo_tool("broken"), FailingHandler)
            .await
            .expect("tool should register");
        let handler = MessageHandler::new(Arc::new(server));

        let error = handler
            .dispatch(
                "tools/call",
                Some(json!({ "name": "broken", "arguments": { "count": 1 } })),
            )
            .await
            .expect_err("handler failure");

        assert!(matches!(
            error.downcast_ref::<McpError>(),
            Some(McpError::ToolExecutionFailed { message, .. }) if message.contains("backend exploded")
        ));
    }

    #[tokio::test]
    async fn instructions_are_returned_from_initialize() {
        let server = McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
            .expect("server should build")
            .with_instructions(Some("Use the Korean data tools".to_string()));
        let handler = MessageHandler::new(Arc::new(server));

        let result = handler
            .dispatch("initialize", Some(initialize_params(MCP_VERSION)))
            .await
            .expect("initialize");

        assert_eq!(result["instructions"], "Use the Korean data tools");
    }
}

#[cfg(test)]
mod transport_tests {
    use crate::mcp::protocol::MCP_VERSION;
    use crate::mcp::{ConnectionState, McpServer};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[tokio::test]
    async fn serve_answers_lines_and_closes_on_eof() {
        let server = Arc::new(
            McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
                .expect("server should build"),
        );

        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, client_out) = tokio::io::duplex(64 * 1024);

        let task = tokio::spawn(Arc::clone(&server).serve(
            BufReader::new(server_in),
            server_out,
            std::future::pending::<()>(),
        ));

        let requests = [
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": MCP_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "1.0.0" }
                }
            }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }),
        ];
        for request in &requests {
            client_in
                .write_all(format!("{}\n", request).as_bytes())
                .await
                .expect("write request");
        }
        client_in.write_all(b"{not json\n").await.expect("write garbage");
        drop(client_in);

        task.await.expect("serve task").expect("serve result");

        let mut lines = BufReader::new(client_out).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.expect("read response") {
            responses.push(serde_json::from_str::<Value>(&line).expect("response is json"));
        }

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], MCP_VERSION);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], json!({}));
        assert_eq!(responses[2]["error"]["code"], -32700);
        assert_eq!(responses[2]["id"], Value::Null);

        assert_eq!(server.connection_state().await, ConnectionState::Closed);
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let server = Arc::new(
            McpServer::new("agentlink-test".to_string(), "0.0.1".to_string())
                .expect("server should build"),
        );

        let (_client_in, server_in) = tokio::io::duplex(1024);
        let (server_out, _client_out) = tokio::io::duplex(1024);

        Arc::clone(&server)
            .serve(BufReader::new(server_in), server_out, async {})
            .await
            .expect("serve should stop cleanly");

        assert_eq!(server.connection_state().await, ConnectionState::Closed);
    }
}
