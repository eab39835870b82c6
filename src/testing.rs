//! In-memory `ChainClient` for unit tests, with per-method call counters.

use crate::client::ChainClient;
use crate::contracts::{IERC20, IUniswapV2Pair};
use crate::error::ChainError;
use crate::types::{BlockRecord, BlockTransactions, FeeData, TransactionRecord};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockChainClient {
    pub block_number: u64,
    blocks: HashMap<u64, BlockRecord>,
    /// Fee responses served in order; the last one repeats
    fees: Mutex<VecDeque<Result<FeeData, ChainError>>>,
    calls: HashMap<(Address, [u8; 4]), Result<Bytes, ChainError>>,
    fail_blocks: bool,

    pub block_number_calls: AtomicUsize,
    pub block_calls: AtomicUsize,
    pub fee_calls: AtomicUsize,
    pub contract_calls: AtomicUsize,
    /// (contract, selector) of every eth_call, in order
    pub call_log: Mutex<Vec<(Address, [u8; 4])>>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, block: BlockRecord) -> Self {
        self.block_number = self.block_number.max(block.number);
        self.blocks.insert(block.number, block);
        self
    }

    pub fn with_failing_blocks(mut self) -> Self {
        self.fail_blocks = true;
        self
    }

    pub fn with_fee(self, fee: Result<FeeData, ChainError>) -> Self {
        self.fees.lock().unwrap().push_back(fee);
        self
    }

    pub fn with_gas_price_wei(self, wei: u128) -> Self {
        self.with_fee(Ok(FeeData {
            gas_price: Some(wei),
        }))
    }

    pub fn with_raw_call(mut self, contract: Address, selector: [u8; 4], output: Bytes) -> Self {
        self.calls.insert((contract, selector), Ok(output));
        self
    }

    pub fn with_failing_call(mut self, contract: Address, selector: [u8; 4]) -> Self {
        self.calls
            .insert((contract, selector), Err(ChainError::Rpc("execution reverted".into())));
        self
    }

    /// Answers name(), symbol() and decimals() for `token`
    pub fn with_token(self, token: Address, name: &str, symbol: &str, decimals: u8) -> Self {
        self.with_raw_call(
            token,
            IERC20::nameCall::SELECTOR,
            name.to_string().abi_encode().into(),
        )
        .with_raw_call(
            token,
            IERC20::symbolCall::SELECTOR,
            symbol.to_string().abi_encode().into(),
        )
        .with_raw_call(
            token,
            IERC20::decimalsCall::SELECTOR,
            U256::from(decimals).abi_encode().into(),
        )
    }

    /// Answers getReserves() for `pair`
    pub fn with_reserves(self, pair: Address, reserve0: u128, reserve1: u128) -> Self {
        let output = (U256::from(reserve0), U256::from(reserve1), U256::from(1_700_000_000u64))
            .abi_encode_params();
        self.with_raw_call(pair, IUniswapV2Pair::getReservesCall::SELECTOR, output.into())
    }

    pub fn fee_call_count(&self) -> usize {
        self.fee_calls.load(Ordering::SeqCst)
    }

    pub fn contract_call_count(&self) -> usize {
        self.contract_calls.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, contract: Address) -> Vec<[u8; 4]> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == contract)
            .map(|(_, s)| *s)
            .collect()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.block_number_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.block_number)
    }

    async fn block(
        &self,
        number: u64,
        full_transactions: bool,
    ) -> Result<Option<BlockRecord>, ChainError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_blocks {
            return Err(ChainError::Rpc("connection reset".into()));
        }
        Ok(self.blocks.get(&number).cloned().map(|mut block| {
            if !full_transactions {
                if let BlockTransactions::Full(txs) = &block.transactions {
                    block.transactions =
                        BlockTransactions::Hashes(txs.iter().map(|tx| tx.hash).collect());
                }
            }
            block
        }))
    }

    async fn fee_data(&self) -> Result<FeeData, ChainError> {
        self.fee_calls.fetch_add(1, Ordering::SeqCst);
        let mut fees = self.fees.lock().unwrap();
        if fees.len() > 1 {
            fees.pop_front().unwrap()
        } else {
            fees.front()
                .cloned()
                .unwrap_or_else(|| Err(ChainError::Rpc("no fee data scripted".into())))
        }
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        self.contract_calls.fetch_add(1, Ordering::SeqCst);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&calldata[..4]);
        self.call_log.lock().unwrap().push((contract, selector));
        self.calls
            .get(&(contract, selector))
            .cloned()
            .unwrap_or_else(|| Err(ChainError::Rpc("execution reverted".into())))
    }
}

/// Transaction moving `value` wei, with a hash derived from `seed`
pub fn transfer_tx(seed: u8, value: U256) -> TransactionRecord {
    TransactionRecord {
        hash: B256::repeat_byte(seed),
        from: Address::repeat_byte(0xaa),
        to: Some(Address::repeat_byte(seed)),
        value,
        gas_limit: 21_000,
        gas_price: Some(20_000_000_000),
        nonce: seed as u64,
    }
}

pub fn block_with(number: u64, txs: Vec<TransactionRecord>) -> BlockRecord {
    BlockRecord {
        number,
        hash: B256::repeat_byte(0x42),
        parent_hash: B256::repeat_byte(0x41),
        timestamp: 1_700_000_000,
        miner: Address::repeat_byte(0x99),
        gas_used: 21_000 * txs.len() as u64,
        gas_limit: 30_000_000,
        base_fee_per_gas: Some(10_000_000_000),
        transactions: BlockTransactions::Full(txs),
    }
}
