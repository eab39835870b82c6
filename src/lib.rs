//! Chain Gateway Library
//!
//! Read-only Ethereum services behind an HTTP API: block and large
//! transfer queries, a TTL-cached gas price with optional background
//! refresh, ERC-20 metadata resolution and Uniswap V2 spot prices.

pub mod api;
pub mod blocks;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod gas;
pub mod pool;
pub mod tokens;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::{router, AppState};
pub use blocks::BlockService;
pub use client::{connect, ChainClient, RpcClient, UnconfiguredClient};
pub use config::{GatewayConfig, RpcProvider};
pub use error::{ChainError, ConfigError, GasPriceError, PriceError, ValidationError};
pub use gas::{GasPriceCache, GasRefreshControl};
pub use pool::{Dex, PairQuote, PriceEngine};
pub use tokens::TokenRegistry;
pub use types::{BlockRecord, FeeData, TokenDescriptor, TransactionRecord, TransferRecord};
