use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod api;
mod config;
mod middleware;

use config::{AppState, ServerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Single tenant over stdin/stdout
    Stdio,
    /// Multi-tenant over HTTP; each request carries its key
    Http,
}

#[derive(Parser, Debug)]
#[command(name = "instantly-mcp")]
#[command(about = "MCP server for the Instantly.ai v2 API", long_about = None)]
struct Args {
    /// Transport to serve MCP on
    #[arg(short, long, value_enum, env = "TRANSPORT_MODE", default_value = "stdio")]
    transport: Transport,

    /// Host to bind to (http transport)
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on (http transport)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Instantly API key used when a call supplies none
    #[arg(long, env = "INSTANTLY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Comma-separated tool categories to load
    #[arg(long, env = "TOOL_CATEGORIES")]
    categories: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "instantly-mcp.toml")]
    config: PathBuf,

    /// Instantly API root
    #[arg(long, env = "INSTANTLY_API_URL")]
    base_url: Option<String>,
}

impl Args {
    /// Command line and environment take precedence over the file.
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.http.host = host;
        }
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(api_key) = self.api_key {
            config.upstream.api_key = Some(api_key);
        }
        if let Some(categories) = self.categories {
            config.tools.categories = categories.split(',').map(|c| c.trim().to_string()).collect();
        }
        if let Some(base_url) = self.base_url {
            config.upstream.base_url = Some(base_url);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instantly=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let transport = args.transport;
    let config_path = args.config.clone();

    let mut config = ServerConfig::load(&config_path)?;
    args.apply(&mut config);

    let categories = config.categories();
    if !categories.ignored.is_empty() {
        tracing::warn!(
            "Ignoring unknown tool categories: {}",
            categories.ignored.join(", ")
        );
    }
    tracing::info!(
        "Starting Instantly MCP server v{} ({:?}, categories: {})",
        env!("CARGO_PKG_VERSION"),
        transport,
        categories
            .enabled
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match transport {
        Transport::Stdio => {
            if config.api_key().is_none() {
                bail!(
                    "No Instantly API key configured. Set INSTANTLY_API_KEY, pass --api-key, \
                     or add api_key under [upstream] in {}",
                    config_path.display()
                );
            }
            let state = AppState::new(&config)?;
            state.mcp.run_stdio().await
        }
        Transport::Http => api::serve(&config).await,
    }
}
