//! Block & Transfer Query Service
//!
//! Thin reads over the chain client: latest block number, a block by
//! number, and the native-currency transfers in a block above a
//! threshold. Transport failures are logged and degrade to an empty
//! result; only a malformed threshold is reported to the caller.

use crate::client::ChainClient;
use crate::error::{ChainError, ValidationError};
use crate::types::{BlockRecord, TransactionRecord, TransferRecord};
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fractional digits of the native currency (wei per ether)
const NATIVE_DECIMALS: usize = 18;

pub struct BlockService {
    client: Arc<dyn ChainClient>,
}

impl BlockService {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    pub async fn latest_block_number(&self) -> Result<u64, ChainError> {
        self.client.block_number().await.map_err(|e| {
            error!("Failed to get latest block number: {}", e);
            e
        })
    }

    /// Block header with transaction hashes, None if unknown or on error
    pub async fn block(&self, number: u64) -> Option<BlockRecord> {
        self.fetch(number, false).await
    }

    /// Block with full transaction bodies, None if unknown or on error
    pub async fn block_with_transactions(&self, number: u64) -> Option<BlockRecord> {
        self.fetch(number, true).await
    }

    /// Transfers in block `number` moving strictly more than `threshold`
    /// (native units, e.g. "1.5"), in block order.
    ///
    /// The threshold is validated before anything is fetched.
    pub async fn large_transfers(
        &self,
        number: u64,
        threshold: &str,
    ) -> Result<Vec<TransferRecord>, ValidationError> {
        let threshold_wei = parse_threshold(threshold)?;

        let Some(block) = self.block_with_transactions(number).await else {
            return Ok(Vec::new());
        };
        let Some(txs) = block.transactions.as_full() else {
            return Ok(Vec::new());
        };

        let transfers = filter_large_transfers(txs, threshold_wei);
        info!(
            "Block {}: {} of {} transactions above {} ETH",
            number,
            transfers.len(),
            txs.len(),
            threshold
        );
        Ok(transfers)
    }

    async fn fetch(&self, number: u64, full_transactions: bool) -> Option<BlockRecord> {
        match self.client.block(number, full_transactions).await {
            Ok(Some(block)) => Some(block),
            Ok(None) => {
                debug!("Block {} not found", number);
                None
            }
            Err(e) => {
                error!("Failed to get block {}: {}", number, e);
                None
            }
        }
    }
}

/// Native-unit decimal string to wei.
///
/// Accepts unsigned decimals with at most 18 fractional digits
/// ("1", "0.5", "2.", ".25"); rejects signs, exponents and empty input.
pub fn parse_threshold(threshold: &str) -> Result<U256, ValidationError> {
    let invalid = || ValidationError::InvalidThreshold(threshold.to_string());

    let (integer, fraction) = threshold.split_once('.').unwrap_or((threshold, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty())
        || !all_digits(integer)
        || !all_digits(fraction)
        || fraction.len() > NATIVE_DECIMALS
    {
        return Err(invalid());
    }

    let integer = if integer.is_empty() { "0" } else { integer };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    parse_ether(&format!("{}.{}", integer, fraction)).map_err(|_| invalid())
}

/// Transactions with value strictly above `threshold_wei`, order kept
pub fn filter_large_transfers(
    txs: &[TransactionRecord],
    threshold_wei: U256,
) -> Vec<TransferRecord> {
    txs.iter()
        .filter(|tx| tx.value > threshold_wei)
        .map(|tx| TransferRecord {
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            value: format_native(tx.value),
        })
        .collect()
}

/// Wei to native units without trailing zeros, e.g. 2 ETH -> "2.0"
fn format_native(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", integer)
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => format!("{}.0", formatted),
    }
}
