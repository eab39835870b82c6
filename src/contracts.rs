//! Contract Definitions
//!
//! Read-only Solidity interfaces the gateway calls, defined with alloy's
//! `sol!` macro. Calls are ABI-encoded here and sent through
//! [`crate::client::ChainClient::call`], so no provider-bound
//! contract instances are generated.

use alloy::sol;

// ── ERC20 ─────────────────────────────────────────────────────────────

sol! {
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

// ── Uniswap V2 ───────────────────────────────────────────────────────

sol! {
    interface IUniswapV2Pair {
        function getReserves()
            external
            view
            returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }
}
