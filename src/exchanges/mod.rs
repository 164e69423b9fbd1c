//! Exchange integration
//!
//! `FuturesExchange` is the contract the validator and dispatcher consume.
//! `binance` implements it against the futures REST API, `mock` implements
//! it in memory for tests and dry runs.

pub mod binance;
pub mod endpoints;
pub mod mock;

use std::fmt;

use thiserror::Error;

use crate::models::{AssetBalance, NewOrderParams, OrderRecord};

pub use binance::BinanceFuturesClient;
pub use mock::MockExchange;

/// Request/response contract of a futures exchange.
pub trait FuturesExchange {
    /// Symbols currently listed on the exchange.
    fn list_instruments(&self) -> Result<Vec<String>, ExchangeError>;

    fn create_order(&self, params: &NewOrderParams) -> Result<OrderRecord, ExchangeError>;

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderRecord, ExchangeError>;

    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, ExchangeError>;
}

impl<T: FuturesExchange + ?Sized> FuturesExchange for &T {
    fn list_instruments(&self) -> Result<Vec<String>, ExchangeError> {
        (**self).list_instruments()
    }

    fn create_order(&self, params: &NewOrderParams) -> Result<OrderRecord, ExchangeError> {
        (**self).create_order(params)
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderRecord, ExchangeError> {
        (**self).get_order(symbol, order_id)
    }

    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, ExchangeError> {
        (**self).get_account_balances()
    }
}

impl<T: FuturesExchange + ?Sized> FuturesExchange for Box<T> {
    fn list_instruments(&self) -> Result<Vec<String>, ExchangeError> {
        (**self).list_instruments()
    }

    fn create_order(&self, params: &NewOrderParams) -> Result<OrderRecord, ExchangeError> {
        (**self).create_order(params)
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderRecord, ExchangeError> {
        (**self).get_order(symbol, order_id)
    }

    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, ExchangeError> {
        (**self).get_account_balances()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The exchange rejected the request itself (bad parameters, auth, ...).
    #[error("API error (http {status}, code {code}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    /// The exchange rejected the order (margin, filters, trigger, ...).
    #[error("order rejected (code {code}): {msg}")]
    Order { code: i64, msg: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Api,
    Order,
    Unexpected,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Api => "Binance API Error",
            ErrorCategory::Order => "Binance Order Error",
            ErrorCategory::Unexpected => "Unexpected error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ExchangeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExchangeError::Api { .. } => ErrorCategory::Api,
            ExchangeError::Order { .. } => ErrorCategory::Order,
            ExchangeError::Transport(_) | ExchangeError::Decode(_) => ErrorCategory::Unexpected,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExchangeError::Decode(err.to_string())
        } else {
            ExchangeError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Decode(err.to_string())
    }
}
