//! Gas Price Cache
//!
//! Holds the last observed gas price (in gwei) with the time it was
//! fetched. Reads inside the TTL are served from memory; a read after the
//! TTL refreshes synchronously through the RPC client.
//!
//! A refresh builds the complete new entry before swapping it in, so
//! concurrent readers see either the old entry or the new one. Racing
//! refreshes just decide which of two fresh values wins.

use crate::client::ChainClient;
use crate::error::{ChainError, GasPriceError};
use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Last successful gas price fetch
#[derive(Debug, Clone, PartialEq)]
pub struct GasPriceEntry {
    /// Gas price in gwei, 9 fractional digits
    pub value_gwei: String,
    pub fetched_at: DateTime<Utc>,
    fetched_instant: Instant,
}

impl GasPriceEntry {
    pub fn age(&self) -> Duration {
        self.fetched_instant.elapsed()
    }
}

pub struct GasPriceCache {
    client: Arc<dyn ChainClient>,
    ttl: Duration,
    entry: RwLock<Option<GasPriceEntry>>,
}

impl GasPriceCache {
    pub fn new(client: Arc<dyn ChainClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current gas price in gwei.
    ///
    /// Fresh cached value if there is one, otherwise a synchronous refresh.
    /// When the refresh fails an older cached value is still served; only
    /// an empty cache produces [`GasPriceError::Unavailable`].
    pub async fn get_cached_or_fetch(&self) -> Result<String, GasPriceError> {
        self.current_entry().await.map(|entry| entry.value_gwei)
    }

    /// Same as [`Self::get_cached_or_fetch`], with the fetch time attached
    pub async fn current_entry(&self) -> Result<GasPriceEntry, GasPriceError> {
        if let Some(entry) = self.snapshot() {
            if entry.age() < self.ttl {
                debug!("Returning cached gas price ({:?} old)", entry.age());
                return Ok(entry);
            }
        }

        if let Err(e) = self.refresh().await {
            error!("Failed to fetch gas price: {}", e);
        }

        match self.snapshot() {
            Some(entry) => Ok(entry),
            None => {
                error!("Failed to retrieve gas price and cache is empty");
                Err(GasPriceError::Unavailable)
            }
        }
    }

    /// Fetch the gas price and overwrite the cache entry.
    ///
    /// Returns the new value, or `Ok(None)` when the provider reported no
    /// gas price (the cache is left untouched).
    pub async fn refresh(&self) -> Result<Option<String>, ChainError> {
        let fee_data = self.client.fee_data().await?;
        let Some(wei) = fee_data.gas_price else {
            warn!("No gas price data available");
            return Ok(None);
        };

        let value_gwei = wei_to_gwei(wei);
        let entry = GasPriceEntry {
            value_gwei: value_gwei.clone(),
            fetched_at: Utc::now(),
            fetched_instant: Instant::now(),
        };
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
        info!("Gas price: {} Gwei", value_gwei);

        Ok(Some(value_gwei))
    }

    /// Copy of the current entry, fresh or not
    pub fn snapshot(&self) -> Option<GasPriceEntry> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Exact wei -> gwei conversion, e.g. 12_345_678_901 -> "12.345678901"
pub fn wei_to_gwei(wei: u128) -> String {
    // gwei is a fixed 9-decimal unit; format_units cannot fail for it
    format_units(U256::from(wei), "gwei").unwrap_or_else(|_| wei.to_string())
}
