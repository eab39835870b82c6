//! Supported DEX protocols
//!
//! Only the Uniswap V2 constant-product model is implemented. Adding a
//! protocol means adding a variant; every match below is exhaustive.

use crate::error::PriceError;
use alloy::primitives::{address, b256, keccak256, Address, B256};
use std::fmt;
use std::str::FromStr;

/// Uniswap V2 factory (Ethereum mainnet)
pub const UNISWAP_V2_FACTORY: Address = address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");

/// keccak256 of the UniswapV2Pair creation code
pub const UNISWAP_V2_INIT_CODE_HASH: B256 =
    b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dex {
    UniswapV2,
}

impl Dex {
    pub fn factory(&self) -> Address {
        match self {
            Dex::UniswapV2 => UNISWAP_V2_FACTORY,
        }
    }

    pub fn init_code_hash(&self) -> B256 {
        match self {
            Dex::UniswapV2 => UNISWAP_V2_INIT_CODE_HASH,
        }
    }

    /// Deterministic CREATE2 address of the pair for two tokens.
    /// Argument order does not matter.
    pub fn pair_address(&self, a: Address, b: Address) -> Result<Address, PriceError> {
        let (token0, token1) = sort_tokens(a, b)?;
        let mut packed = [0u8; 40];
        packed[..20].copy_from_slice(token0.as_slice());
        packed[20..].copy_from_slice(token1.as_slice());
        let salt = keccak256(packed);

        Ok(self.factory().create2(salt.0, self.init_code_hash().0))
    }
}

/// Order two tokens the way V2 pools do: lower address is token0
pub fn sort_tokens(a: Address, b: Address) -> Result<(Address, Address), PriceError> {
    if a == b {
        return Err(PriceError::IdenticalTokens(a));
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

impl FromStr for Dex {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniswapv2" => Ok(Dex::UniswapV2),
            _ => Err(PriceError::UnsupportedDex(s.to_string())),
        }
    }
}

impl fmt::Display for Dex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dex::UniswapV2 => write!(f, "UniswapV2"),
        }
    }
}
