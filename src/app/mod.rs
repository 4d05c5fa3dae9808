//! Server assembly
//!
//! Builds the AgentLink MCP server with the full tool catalog registered.


use crate::config::ServerConfig;
use crate::mcp::McpServer;
use crate::mcp::tools::{
    register_business_tools, register_disaster_tools, register_legal_tools,
    register_public_data_tools, register_tax_tools,
};
use crate::provider::{DataProvider, StubDataProvider};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub use crate::config::DEFAULT_SERVER_NAME as SERVER_NAME;

/// Options for [`create_server`]
#[derive(Clone, Default)]
pub struct CreateServerOptions {
    /// Backing data provider; the stub provider is used when absent
    pub provider: Option<Arc<dyn DataProvider>>,
    /// Identity reported from `initialize`
    pub server: ServerConfig,
}

impl CreateServerOptions {
    #[inline]
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }
}

/// Create the MCP server and register every tool group against one provider
#[inline]
pub async fn create_server(options: CreateServerOptions) -> Result<McpServer> {
    let CreateServerOptions { provider, server } = options;

    let provider = provider.unwrap_or_else(|| {
        warn!("No data provider configured, answering every tool with stub data");
        Arc::new(StubDataProvider::new())
    });

    let mcp = McpServer::new(server.name, server.version)
        .context("Failed to create MCP server")?
        .with_instructions(server.instructions);

    register_tax_tools(&mcp, Arc::clone(&provider))
        .await
        .context("Failed to register tax tools")?;
    register_business_tools(&mcp, Arc::clone(&provider))
        .await
        .context("Failed to register business tools")?;
    register_public_data_tools(&mcp, Arc::clone(&provider))
        .await
        .context("Failed to register public data tools")?;
    register_legal_tools(&mcp, Arc::clone(&provider))
        .await
        .context("Failed to register legal tools")?;
    register_disaster_tools(&mcp, provider)
        .await
        .context("Failed to register disaster tools")?;

    info!(
        "{} {} ready with {} tools",
        mcp.server_info.name,
        mcp.server_info.version,
        mcp.list_tools().await.len()
    );

    Ok(mcp)
}
