// Core data structures shared by the gateway services

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Decimals assumed when a token's metadata could not be resolved
pub const DEFAULT_DECIMALS: u8 = 18;

/// ERC-20 token metadata, enriched in place by the token registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

impl TokenDescriptor {
    /// Address-only descriptor, before any resolution
    pub fn new(address: Address) -> Self {
        Self {
            address,
            name: None,
            symbol: None,
            decimals: None,
        }
    }

    /// True once name, symbol and decimals are all known
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.symbol.is_some() && self.decimals.is_some()
    }

    pub fn decimals_or_default(&self) -> u8 {
        self.decimals.unwrap_or(DEFAULT_DECIMALS)
    }

    /// Symbol for log lines, falling back to the address
    pub fn label(&self) -> String {
        match &self.symbol {
            Some(symbol) => symbol.clone(),
            None => format!("{:?}", self.address),
        }
    }
}

/// Fee data reported by the RPC provider (all values in wei)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    pub gas_price: Option<u128>,
}

/// A transaction body as returned inside a full block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: B256,
    pub from: Address,
    /// None for contract creation
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub nonce: u64,
}

/// Transactions of a block: hashes only, or full bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<B256>),
    Full(Vec<TransactionRecord>),
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Hashes(hashes) => hashes.len(),
            BlockTransactions::Full(txs) => txs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full bodies, if the block was fetched with them
    pub fn as_full(&self) -> Option<&[TransactionRecord]> {
        match self {
            BlockTransactions::Full(txs) => Some(txs),
            BlockTransactions::Hashes(_) => None,
        }
    }
}

/// Block header fields plus its transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
    pub miner: Address,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: Option<u64>,
    pub transactions: BlockTransactions,
}

/// Native-currency transfer above a caller-supplied threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    /// Value in native units (e.g. "2.5" ETH)
    pub value: String,
}

/// Reserves of a constant-product pair, with tokens in pool order
/// (token0 has the lower address)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReserves {
    pub pair: Address,
    pub token0: TokenDescriptor,
    pub token1: TokenDescriptor,
    pub reserve0: U256,
    pub reserve1: U256,
}

impl PoolReserves {
    /// Reserve held by the pool for `token`, None if the token is not in the pool
    pub fn reserve_of(&self, token: Address) -> Option<U256> {
        if token == self.token0.address {
            Some(self.reserve0)
        } else if token == self.token1.address {
            Some(self.reserve1)
        } else {
            None
        }
    }
}
