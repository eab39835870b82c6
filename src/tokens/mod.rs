//! Token metadata
//!
//! Static table of well-known mainnet tokens, a resolver that falls
//! back to live ERC-20 reads, and address validation for user input.

pub mod address;
pub mod known;
pub mod registry;

pub use address::parse_address;
pub use known::{known_token, KNOWN_TOKENS};
pub use registry::TokenRegistry;
