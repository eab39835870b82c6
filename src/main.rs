//! Chain Gateway
//!
//! Serves block queries, large-transfer scans, the cached gas price and
//! Uniswap V2 spot prices over HTTP.
//!
//! Settings come from flags or the environment (.env is loaded first),
//! optionally overridden by `--config <file.toml>`. An unsupported RPC
//! provider is logged and the server still starts; chain-backed routes
//! then answer with their failure results.
//!
//! SIGINT / SIGTERM stop the gas refresh task and drain the server.

use anyhow::{Context, Result};
use chain_gateway::config::{GatewayConfig, DEFAULT_GAS_CACHE_TTL_MS, DEFAULT_PORT};
use chain_gateway::{connect, router, AppState};
use clap::Parser;
use futures::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Ethereum RPC gateway
#[derive(Parser)]
#[command(name = "chain-gateway")]
struct Args {
    /// HTTP listen port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Gas price cache TTL in milliseconds
    #[arg(long, env = "GAS_CACHE_TTL_MS", default_value_t = DEFAULT_GAS_CACHE_TTL_MS)]
    gas_cache_ttl_ms: u64,

    /// Hosted RPC provider (Alchemy, Infura)
    #[arg(long, env = "RPC_PROVIDER", default_value = "Alchemy")]
    rpc_provider: String,

    #[arg(long, env = "RPC_API_KEY", default_value = "0", hide_env_values = true)]
    rpc_api_key: String,

    /// Network name used in the provider URL
    #[arg(long, env = "NETWORK", default_value = "mainnet")]
    network: String,

    /// Start the gas price refresh task at boot
    #[arg(long, env = "GAS_AUTO_REFRESH")]
    gas_auto_refresh: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// TOML file overriding the settings above
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig {
            port: self.port,
            gas_cache_ttl_ms: self.gas_cache_ttl_ms,
            rpc_provider: self.rpc_provider.clone(),
            rpc_api_key: self.rpc_api_key.clone(),
            network: self.network.clone(),
            gas_auto_refresh: self.gas_auto_refresh,
        };
        if let Some(path) = &self.config {
            config.apply_file(path)?;
            info!("Configuration overrides loaded from {}", path.display());
        }
        Ok(config)
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_json);

    info!("Chain Gateway starting...");
    let config = args.gateway_config()?;

    let gas_cache_ttl = config.gas_cache_ttl().unwrap_or_else(|e| {
        error!("{} - using {}ms", e, DEFAULT_GAS_CACHE_TTL_MS);
        Duration::from_millis(DEFAULT_GAS_CACHE_TTL_MS)
    });
    info!("Gas price cache TTL: {:?}", gas_cache_ttl);

    let client = connect(&config);
    let state = AppState::new(client, gas_cache_ttl, &config.rpc_provider);
    if config.gas_auto_refresh {
        state.gas_refresh.start().await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    let signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    let signals_handle = signals.handle();

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal(signals))
        .await
        .context("HTTP server failed")?;

    signals_handle.close();
    state.gas_refresh.stop().await;
    info!("Chain Gateway stopped");
    Ok(())
}

async fn shutdown_signal(mut signals: Signals) {
    if let Some(sig) = signals.next().await {
        info!("Received signal {} - shutting down", sig);
    }
}
