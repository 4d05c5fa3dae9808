use agentlink_mcp::commands::{init_config, list_tools, serve_mcp, show_config};
use agentlink_mcp::config::{CONFIG_DIR_ENV, Config, resolve_config_dir};
use agentlink_mcp::{AgentLinkError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agentlink-mcp")]
#[command(about = "MCP server exposing Korean tax, business, public, legal and disaster data tools")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml (defaults to $AGENTLINK_CONFIG_DIR, then ~/.agentlink)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio (default)
    Serve,
    /// Print the tool catalog as JSON
    Tools,
    /// Write config.toml with defaults if missing, or inspect it with --show
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn load_config(config_dir: Option<PathBuf>) -> Result<Config> {
    let dir = resolve_config_dir(config_dir, std::env::var_os(CONFIG_DIR_ENV))?;
    Ok(Config::load(dir)?)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(cli.config_dir) {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    init_tracing(&config.logging.level);

    let outcome = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve_mcp(&config).await,
        Commands::Tools => list_tools(&config).await,
        Commands::Config { show } => {
            if show {
                show_config(&config)
            } else {
                init_config(&config).map(|_| ())
            }
        }
    };

    outcome.map_err(|e| {
        error!("{:#}", e);
        AgentLinkError::Other(e)
    })
}
