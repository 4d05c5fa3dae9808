use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::app::{CreateServerOptions, create_server};
use crate::config::Config;

/// Start the MCP server on stdio and run until EOF or a shutdown signal
#[inline]
pub async fn serve_mcp(config: &Config) -> Result<()> {
    info!(
        "Starting {} {} on stdio transport",
        config.server.name, config.server.version
    );

    let options = CreateServerOptions::default().with_server(config.server.clone());
    let server = Arc::new(
        create_server(options)
            .await
            .context("Failed to assemble MCP server")?,
    );

    eprintln!("AgentLink MCP server running on stdio. Press Ctrl+C to stop.");

    Arc::clone(&server).serve_stdio(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Print the tool catalog as pretty JSON
#[inline]
pub async fn list_tools(config: &Config) -> Result<()> {
    let options = CreateServerOptions::default().with_server(config.server.clone());
    let server = create_server(options)
        .await
        .context("Failed to assemble MCP server")?;

    let tools = server.list_tools().await;
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

/// Print the effective configuration and where it lives
#[inline]
pub fn show_config(config: &Config) -> Result<()> {
    let config_path = config.config_file_path();

    eprintln!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        eprintln!("(not found, showing defaults)");
    }
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Write the current settings to `config.toml` unless the file already exists
///
/// Returns whether a file was written.
#[inline]
pub fn init_config(config: &Config) -> Result<bool> {
    let config_path = config.config_file_path();
    if config_path.exists() {
        eprintln!(
            "Configuration already exists at {}; edit it or pass --show to print it.",
            config_path.display()
        );
        return Ok(false);
    }

    config.save()?;
    info!("Wrote default configuration to {}", config_path.display());
    eprintln!("Wrote {}", config_path.display());
    Ok(true)
}

/// Resolves on SIGINT, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received interrupt signal, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
