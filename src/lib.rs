//! Places market, limit and stop-limit orders on Binance USDⓈ-M futures
//! (testnet by default) after validating them locally.

pub mod config;
pub mod exchanges;
pub mod execution;
pub mod models;
pub mod utils;

#[cfg(feature = "cli")]
pub mod cli;
