//! Error types
//!
//! One enum per seam: RPC transport, price derivation, gas cache,
//! request validation and configuration.

use alloy::primitives::Address;
use thiserror::Error;

/// Failure of a call through the RPC client adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("RPC provider not configured: {0}")]
    NotConfigured(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// Failure while deriving a pair price.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Unsupported DEX: {0}")]
    UnsupportedDex(String),

    #[error("Identical token addresses: {0}")]
    IdenticalTokens(Address),

    #[error("Could not read reserves of pair {pair}: {source}")]
    PoolUnavailable { pair: Address, source: ChainError },

    #[error("Pair {0} has no liquidity")]
    EmptyPool(Address),

    #[error("Price out of representable range for pair {0}")]
    Overflow(Address),
}

/// The gas cache holds no value and the refresh did not produce one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GasPriceError {
    #[error("No gas price data available")]
    Unavailable,
}

/// Rejected before any RPC call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported RPC provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    #[error("Gas cache TTL must be greater than zero")]
    ZeroTtl,
}
