//! Token Registry & Resolver
//!
//! Resolves an address to {name, symbol, decimals}:
//! 1. static table of well-known tokens (authoritative, no RPC)
//! 2. in-process cache of previously resolved tokens
//! 3. live `name()` / `symbol()` / `decimals()` reads, issued concurrently
//!
//! Resolution never fails. When the live reads fail the caller receives
//! the address-only descriptor and proceeds with default decimals.
//!
//! The cache is unbounded: entries are added once complete and never
//! evicted or rewritten. Two concurrent resolutions of the same cold
//! address may both fetch; both write the same value.

use crate::client::{call_contract, ChainClient};
use crate::contracts::IERC20;
use crate::error::ChainError;
use crate::tokens::known::known_token;
use crate::types::TokenDescriptor;
use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct TokenRegistry {
    client: Arc<dyn ChainClient>,
    /// Keyed by parsed address, so lookups ignore hex case
    cache: DashMap<Address, TokenDescriptor>,
}

impl TokenRegistry {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            cache: DashMap::new(),
        }
    }

    pub async fn resolve(&self, address: Address) -> TokenDescriptor {
        if let Some(token) = known_token(address) {
            return token;
        }
        if let Some(token) = self.cached(address) {
            return token;
        }

        warn!("{:?} is not a known token, fetching metadata from chain", address);
        match self.fetch(address).await {
            Ok(token) => {
                debug!(
                    "Resolved {:?}: {} ({} decimals)",
                    address,
                    token.label(),
                    token.decimals_or_default()
                );
                self.cache.insert(address, token.clone());
                token
            }
            Err(e) => {
                error!("Failed to fetch token info for {:?}: {}", address, e);
                TokenDescriptor::new(address)
            }
        }
    }

    /// Resolve both tokens concurrently; one failing does not affect the other
    pub async fn resolve_pair(
        &self,
        a: Address,
        b: Address,
    ) -> (TokenDescriptor, TokenDescriptor) {
        tokio::join!(self.resolve(a), self.resolve(b))
    }

    /// Complete cached descriptor, if any
    pub fn cached(&self, address: Address) -> Option<TokenDescriptor> {
        self.cache
            .get(&address)
            .map(|entry| entry.value().clone())
            .filter(TokenDescriptor::is_complete)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    async fn fetch(&self, address: Address) -> Result<TokenDescriptor, ChainError> {
        let client = self.client.as_ref();
        let (name, symbol, decimals) = tokio::try_join!(
            call_contract(client, address, IERC20::nameCall {}),
            call_contract(client, address, IERC20::symbolCall {}),
            call_contract(client, address, IERC20::decimalsCall {}),
        )?;

        Ok(TokenDescriptor {
            address,
            name: Some(name),
            symbol: Some(symbol),
            decimals: Some(decimals),
        })
    }
}
