//! Pair pricing for constant-product DEX pools
//!
//! Pair address derivation, reserve reads and decimal-normalized mid
//! prices. Only Uniswap V2 is supported.

pub mod calculator;
pub mod dex;
pub mod engine;

pub use calculator::{PriceCalculator, PRICE_SIGNIFICANT_DIGITS};
pub use dex::{sort_tokens, Dex, UNISWAP_V2_FACTORY, UNISWAP_V2_INIT_CODE_HASH};
pub use engine::{PairQuote, PriceEngine};
