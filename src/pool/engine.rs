//! Pair Price Engine
//!
//! Spot price of token A in units of token B from a V2 pair's reserves:
//! resolve both tokens, derive the pair address (CREATE2, no RPC), read
//! `getReserves()`, line the tokens up with the pool's ascending-address
//! order and compute the decimal-normalized mid price.
//!
//! Every failure is logged and returned as a [`PriceError`]; nothing
//! here panics on chain data.

use super::calculator::{PriceCalculator, PRICE_SIGNIFICANT_DIGITS};
use super::dex::{sort_tokens, Dex};
use crate::client::{call_contract, ChainClient};
use crate::contracts::IUniswapV2Pair;
use crate::error::PriceError;
use crate::tokens::TokenRegistry;
use crate::types::{PoolReserves, TokenDescriptor};
use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// A computed price together with the reserves it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairQuote {
    #[serde(serialize_with = "serialize_display")]
    pub dex: Dex,
    pub base: TokenDescriptor,
    pub quote: TokenDescriptor,
    pub reserves: PoolReserves,
    /// Price of one base token in quote tokens, 18 significant digits
    pub price: String,
}

impl PairQuote {
    pub fn price_f64(&self) -> f64 {
        // digits-only string produced by PriceCalculator
        self.price.parse().unwrap_or(f64::NAN)
    }
}

fn serialize_display<S: serde::Serializer>(dex: &Dex, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(dex)
}

pub struct PriceEngine {
    client: Arc<dyn ChainClient>,
    tokens: Arc<TokenRegistry>,
}

impl PriceEngine {
    pub fn new(client: Arc<dyn ChainClient>, tokens: Arc<TokenRegistry>) -> Self {
        Self { client, tokens }
    }

    /// Price of `token_a` denominated in `token_b` on `dex_id`
    pub async fn price_of(
        &self,
        dex_id: &str,
        token_a: Address,
        token_b: Address,
    ) -> Result<f64, PriceError> {
        self.quote(dex_id, token_a, token_b)
            .await
            .map(|quote| quote.price_f64())
    }

    pub async fn quote(
        &self,
        dex_id: &str,
        token_a: Address,
        token_b: Address,
    ) -> Result<PairQuote, PriceError> {
        let dex: Dex = dex_id.parse().map_err(|e| {
            error!("{}", e);
            e
        })?;

        let (base, quote) = self.tokens.resolve_pair(token_a, token_b).await;

        let result = match dex {
            Dex::UniswapV2 => {
                self.quote_constant_product(dex, base.clone(), quote.clone())
                    .await
            }
        };
        if let Err(e) = &result {
            error!(
                "Could not get price for pair {}/{} on {}: {}",
                base.label(),
                quote.label(),
                dex,
                e
            );
        }
        result
    }

    /// Read the pair's reserves, with tokens in pool order
    pub async fn read_reserves(
        &self,
        dex: Dex,
        a: TokenDescriptor,
        b: TokenDescriptor,
    ) -> Result<PoolReserves, PriceError> {
        let pair = dex.pair_address(a.address, b.address)?;
        let (token0_address, _) = sort_tokens(a.address, b.address)?;
        let (token0, token1) = if a.address == token0_address {
            (a, b)
        } else {
            (b, a)
        };

        let call = IUniswapV2Pair::getReservesCall {};
        let reserves = call_contract(self.client.as_ref(), pair, call)
            .await
            .map_err(|source| PriceError::PoolUnavailable { pair, source })?;

        debug!(
            "{} pair {:?}: reserves ({}, {}) for {}/{}",
            dex,
            pair,
            reserves.reserve0,
            reserves.reserve1,
            token0.label(),
            token1.label()
        );

        Ok(PoolReserves {
            pair,
            token0,
            token1,
            reserve0: U256::from(reserves.reserve0),
            reserve1: U256::from(reserves.reserve1),
        })
    }

    async fn quote_constant_product(
        &self,
        dex: Dex,
        base: TokenDescriptor,
        quote: TokenDescriptor,
    ) -> Result<PairQuote, PriceError> {
        let reserves = self.read_reserves(dex, base.clone(), quote.clone()).await?;
        let pair = reserves.pair;

        let reserve_base = reserves.reserve_of(base.address).unwrap_or(U256::ZERO);
        let reserve_quote = reserves.reserve_of(quote.address).unwrap_or(U256::ZERO);
        if reserve_base.is_zero() || reserve_quote.is_zero() {
            return Err(PriceError::EmptyPool(pair));
        }

        let (numerator, denominator) = PriceCalculator::mid_price_ratio(
            reserve_base,
            base.decimals_or_default(),
            reserve_quote,
            quote.decimals_or_default(),
        )
        .ok_or(PriceError::Overflow(pair))?;
        let price =
            PriceCalculator::to_significant(numerator, denominator, PRICE_SIGNIFICANT_DIGITS);

        Ok(PairQuote {
            dex,
            base,
            quote,
            reserves,
            price,
        })
    }
}
