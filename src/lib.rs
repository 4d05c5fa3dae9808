use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentLinkError>;

#[derive(Error, Debug)]
pub enum AgentLinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] provider::ProviderError),

    #[error("MCP error: {0}")]
    Mcp(#[from] mcp::McpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod app;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod mcp;
pub mod provider;
