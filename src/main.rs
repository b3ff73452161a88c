use anyhow::{anyhow, Context};
use clap::Parser;
use pokeproxy::config::Config;
use pokeproxy::server::ApiServer;
use pokeproxy::service::LookupService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Pokeproxy - read-through caching proxy over the PokeAPI creature data
#[derive(Parser, Debug)]
#[command(name = "pokeproxy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port from the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).map_err(|e| anyhow!(e))?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    if args.test {
        println!("Configuration OK");
        return Ok(());
    }

    pokeproxy::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = ?args.config,
        server_address = %config.server.address,
        server_port = config.server.port,
        upstream = %config.upstream.pokemon_url,
        cache_enabled = config.cache.enabled,
        cache_ttl_seconds = config.cache.ttl_seconds,
        cache_max_entries = config.cache.max_entries,
        "Configuration loaded successfully"
    );

    let service = LookupService::from_config(&config).context("Failed to build upstream client")?;
    let server = Arc::new(ApiServer::new(Arc::new(service)));

    let listen_addr = config.server.bind_address();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;

    tracing::info!(address = %listen_addr, "Starting Pokeproxy");

    server.serve(listener).await?;
    Ok(())
}
