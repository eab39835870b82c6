//! Configuration management
//! Settings come from CLI flags / environment (.env via dotenv),
//! optionally overridden by a TOML file.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GAS_CACHE_TTL_MS: u64 = 5000;

/// Hosted RPC providers the gateway knows how to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcProvider {
    Alchemy,
    Infura,
}

impl RpcProvider {
    /// HTTPS endpoint for `network` (e.g. "mainnet", "sepolia")
    pub fn endpoint(&self, network: &str, api_key: &str) -> String {
        match self {
            RpcProvider::Alchemy => {
                format!("https://eth-{}.g.alchemy.com/v2/{}", network, api_key)
            }
            RpcProvider::Infura => format!("https://{}.infura.io/v3/{}", network, api_key),
        }
    }
}

impl FromStr for RpcProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alchemy" => Ok(RpcProvider::Alchemy),
            "infura" => Ok(RpcProvider::Infura),
            _ => Err(ConfigError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl fmt::Display for RpcProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RpcProvider::Alchemy => write!(f, "Alchemy"),
            RpcProvider::Infura => write!(f, "Infura"),
        }
    }
}

/// Gateway configuration, consumed as plain values at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub gas_cache_ttl_ms: u64,
    /// Raw provider name; validated lazily so an unsupported value is
    /// reported without stopping the process
    pub rpc_provider: String,
    pub rpc_api_key: String,
    pub network: String,
    /// Start the gas refresh task at boot
    pub gas_auto_refresh: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gas_cache_ttl_ms: DEFAULT_GAS_CACHE_TTL_MS,
            rpc_provider: "Alchemy".to_string(),
            rpc_api_key: "0".to_string(),
            network: "mainnet".to_string(),
            gas_auto_refresh: false,
        }
    }
}

impl GatewayConfig {
    pub fn provider(&self) -> std::result::Result<RpcProvider, ConfigError> {
        self.rpc_provider.parse()
    }

    pub fn rpc_url(&self) -> std::result::Result<String, ConfigError> {
        let provider = self.provider()?;
        Ok(provider.endpoint(&self.network, &self.rpc_api_key))
    }

    pub fn gas_cache_ttl(&self) -> std::result::Result<Duration, ConfigError> {
        if self.gas_cache_ttl_ms == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(Duration::from_millis(self.gas_cache_ttl_ms))
    }

    /// Apply overrides from a TOML file; keys absent from the file keep
    /// their current values.
    pub fn apply_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let file: FileConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        self.merge(file);
        Ok(())
    }

    fn merge(&mut self, file: FileConfig) {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(ttl) = file.gas_cache_ttl_ms {
            self.gas_cache_ttl_ms = ttl;
        }
        if let Some(gas_auto_refresh) = file.gas_auto_refresh {
            self.gas_auto_refresh = gas_auto_refresh;
        }
        if let Some(blockchain) = file.blockchain {
            if let Some(provider) = blockchain.rpc_provider {
                self.rpc_provider = provider;
            }
            if let Some(key) = blockchain.rpc_api_key {
                self.rpc_api_key = key;
            }
            if let Some(network) = blockchain.network {
                self.network = network;
            }
        }
    }
}

/// TOML file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub gas_cache_ttl_ms: Option<u64>,
    pub gas_auto_refresh: Option<bool>,
    pub blockchain: Option<BlockchainSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockchainSection {
    pub rpc_provider: Option<String>,
    pub rpc_api_key: Option<String>,
    pub network: Option<String>,
}
