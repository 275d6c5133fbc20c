pub mod arbitrage;
pub mod blockchain;
pub mod bot;
pub mod config;
pub mod dex;
pub mod error;
pub mod execution;
pub mod signer;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ArbResult, ArbitrageError};
pub use types::*;
