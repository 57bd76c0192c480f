// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use lolbyte_core::config::API_KEY_ENV;
use lolbyte_core::{FetchPipeline, LolbyteConfig, RiotApi};
use lolbyte_mcp::server::McpServer;
use lolbyte_mcp::tools::riot_tool_registry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lolbyte-mcp")]
#[command(about = "MCP server for League of Legends and TFT player lookups", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lolbyte.toml")]
    config: PathBuf,

    /// Riot API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// Platform shard for league lookups (overrides the config file)
    #[arg(short, long)]
    platform: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the protocol, so log to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Lolbyte MCP Server starting...");

    let mut config = LolbyteConfig::load(&args.config, args.api_key)?;
    if let Some(platform) = args.platform {
        config.riot.platform = platform;
        config.validate()?;
    }
    tracing::info!(
        platform = %config.riot.platform,
        regional = %config.regional(),
        cache_ttl_secs = config.cache.ttl_secs,
        min_spacing_ms = config.rate_limit.min_spacing_ms,
        "Configuration loaded"
    );

    // One cache and one rate limiter for the whole process
    let pipeline = FetchPipeline::from_config(&config).context("Failed to build fetch pipeline")?;
    let api = RiotApi::new(pipeline, &config).context("Failed to build Riot API client")?;

    let registry = riot_tool_registry(api);
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}
