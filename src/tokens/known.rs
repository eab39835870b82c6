//! Well-known Ethereum mainnet tokens.
//!
//! Entries here are authoritative: the registry never issues contract
//! calls for them.

use crate::types::TokenDescriptor;
use alloy::primitives::{address, Address};

pub struct KnownToken {
    pub address: Address,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

pub const KNOWN_TOKENS: &[KnownToken] = &[
    // Stablecoins
    KnownToken {
        address: address!("dAC17F958D2ee523a2206206994597C13D831ec7"),
        name: "Tether USD",
        symbol: "USDT",
        decimals: 6,
    },
    KnownToken {
        address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        name: "USDC",
        symbol: "USDC",
        decimals: 6,
    },
    KnownToken {
        address: address!("6B175474E89094C44Da98b954EedeAC495271d0F"),
        name: "Dai Stablecoin",
        symbol: "DAI",
        decimals: 18,
    },
    // Other tokens
    KnownToken {
        address: address!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
        name: "Wrapped Bitcoin",
        symbol: "WBTC",
        decimals: 8,
    },
    KnownToken {
        address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        name: "Wrapped Ether",
        symbol: "WETH",
        decimals: 18,
    },
];

impl KnownToken {
    pub fn descriptor(&self) -> TokenDescriptor {
        TokenDescriptor {
            address: self.address,
            name: Some(self.name.to_string()),
            symbol: Some(self.symbol.to_string()),
            decimals: Some(self.decimals),
        }
    }
}

/// Complete descriptor for `address` if it is a well-known token
pub fn known_token(address: Address) -> Option<TokenDescriptor> {
    KNOWN_TOKENS
        .iter()
        .find(|token| token.address == address)
        .map(KnownToken::descriptor)
}
