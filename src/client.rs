//! RPC Client Adapter
//!
//! The narrow interface the gateway core uses to reach the chain:
//! latest block number, block by number, fee data and read-only
//! contract calls. [`RpcClient`] implements it over any alloy
//! [`Provider`]; [`UnconfiguredClient`] stands in when the configured
//! RPC provider is unsupported, so the service keeps running and every
//! chain-backed operation degrades to its empty/failure result.

use crate::config::GatewayConfig;
use crate::error::ChainError;
use crate::types::{BlockRecord, BlockTransactions, FeeData, TransactionRecord};
use alloy::consensus::BlockHeader;
use alloy::eips::BlockNumberOrTag;
use alloy::network::{TransactionBuilder, TransactionResponse};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, Transaction, TransactionRequest};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Chain access used by the gateway services.
///
/// Every method is async and may fail with a transport error; callers
/// decide how each failure degrades.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Block by number, `Ok(None)` if the node does not know it
    async fn block(
        &self,
        number: u64,
        full_transactions: bool,
    ) -> Result<Option<BlockRecord>, ChainError>;

    async fn fee_data(&self) -> Result<FeeData, ChainError>;

    /// `eth_call` against `contract` with raw calldata
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, ChainError>;
}

/// Encode `call`, send it through `client`, decode the return data.
pub async fn call_contract<C: SolCall>(
    client: &dyn ChainClient,
    contract: Address,
    call: C,
) -> Result<C::Return, ChainError> {
    let output = client.call(contract, Bytes::from(call.abi_encode())).await?;
    C::abi_decode_returns(&output).map_err(|e| ChainError::Decode(e.to_string()))
}

/// [`ChainClient`] over an alloy provider
pub struct RpcClient<P> {
    provider: P,
}

impl<P: Provider + 'static> RpcClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + 'static> ChainClient for RpcClient<P> {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn block(
        &self,
        number: u64,
        full_transactions: bool,
    ) -> Result<Option<BlockRecord>, ChainError> {
        let request = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number));
        let block = if full_transactions {
            request.full().await
        } else {
            request.await
        }
        .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(block.map(|b| block_record(&b)))
    }

    async fn fee_data(&self) -> Result<FeeData, ChainError> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(FeeData {
            gas_price: Some(gas_price),
        })
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(calldata);
        self.provider
            .call(tx)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }
}

fn block_record(block: &Block) -> BlockRecord {
    let header = &block.header;
    let transactions = match &block.transactions {
        alloy::rpc::types::BlockTransactions::Full(txs) => {
            BlockTransactions::Full(txs.iter().map(transaction_record).collect())
        }
        alloy::rpc::types::BlockTransactions::Hashes(hashes) => {
            BlockTransactions::Hashes(hashes.clone())
        }
        alloy::rpc::types::BlockTransactions::Uncle => BlockTransactions::Hashes(Vec::new()),
    };

    BlockRecord {
        number: header.number(),
        hash: header.hash,
        parent_hash: header.parent_hash(),
        timestamp: header.timestamp(),
        miner: header.beneficiary(),
        gas_used: header.gas_used(),
        gas_limit: header.gas_limit(),
        base_fee_per_gas: header.base_fee_per_gas(),
        transactions,
    }
}

fn transaction_record(tx: &Transaction) -> TransactionRecord {
    TransactionRecord {
        hash: TransactionResponse::tx_hash(tx),
        from: TransactionResponse::from(tx),
        to: alloy::consensus::Transaction::to(tx),
        value: alloy::consensus::Transaction::value(tx),
        gas_limit: alloy::consensus::Transaction::gas_limit(tx),
        gas_price: alloy::consensus::Transaction::gas_price(tx),
        nonce: alloy::consensus::Transaction::nonce(tx),
    }
}

/// Placeholder client for an unsupported RPC provider setting.
/// Every call fails with [`ChainError::NotConfigured`].
pub struct UnconfiguredClient {
    reason: String,
}

impl UnconfiguredClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ChainError {
        ChainError::NotConfigured(self.reason.clone())
    }
}

#[async_trait]
impl ChainClient for UnconfiguredClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        Err(self.error())
    }

    async fn block(&self, _number: u64, _full: bool) -> Result<Option<BlockRecord>, ChainError> {
        Err(self.error())
    }

    async fn fee_data(&self) -> Result<FeeData, ChainError> {
        Err(self.error())
    }

    async fn call(&self, _contract: Address, _calldata: Bytes) -> Result<Bytes, ChainError> {
        Err(self.error())
    }
}

/// Build the chain client for `config`.
///
/// Configuration errors are logged and produce an [`UnconfiguredClient`]
/// instead of aborting startup.
pub fn connect(config: &GatewayConfig) -> Arc<dyn ChainClient> {
    let url = match config.rpc_url() {
        Ok(url) => url,
        Err(e) => {
            error!("{} - chain-backed endpoints are disabled", e);
            return Arc::new(UnconfiguredClient::new(e.to_string()));
        }
    };

    let parsed: reqwest::Url = match url.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Invalid RPC URL for {}: {}", config.rpc_provider, e);
            return Arc::new(UnconfiguredClient::new(format!("invalid RPC URL: {}", e)));
        }
    };

    info!(
        "RPC provider: {} ({} network)",
        config.rpc_provider, config.network
    );
    let provider = ProviderBuilder::new().connect_http(parsed);
    Arc::new(RpcClient::new(provider))
}
