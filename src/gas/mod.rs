//! Gas price caching and background refresh

pub mod cache;
pub mod refresher;

pub use cache::{wei_to_gwei, GasPriceCache, GasPriceEntry};
pub use refresher::GasRefreshControl;
