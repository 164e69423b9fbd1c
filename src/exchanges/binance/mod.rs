//! Binance USDT-margined futures REST client (blocking).

pub mod auth;
pub mod parser;

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use log::debug;
use reqwest::Method;
use reqwest::blocking::{Client, Response};

use crate::config::{Credentials, ExchangeConfig};
use crate::exchanges::endpoints::BinanceFuturesRest;
use crate::exchanges::{ExchangeError, FuturesExchange};
use crate::models::{AssetBalance, NewOrderParams, OrderRecord};
use crate::utils::time::timestamp_millis;

use auth::{QueryParams, order_params, signed_query};
use parser::{classify_error, parse_order, parse_symbols};

pub struct BinanceFuturesClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    recv_window_ms: u64,
}

impl fmt::Debug for BinanceFuturesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceFuturesClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

impl BinanceFuturesClient {
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        recv_window_ms: u64,
        timeout: Duration,
    ) -> Result<Self, ExchangeError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms,
        })
    }

    pub fn from_config(config: &ExchangeConfig) -> anyhow::Result<Self> {
        let credentials = config.credentials()?;
        Self::new(
            credentials,
            &config.base_url,
            config.recv_window_ms,
            Duration::from_secs(config.timeout_secs),
        )
        .context("failed to build Binance futures HTTP client")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn public_get(&self, path: &str) -> Result<String, ExchangeError> {
        let url = BinanceFuturesRest::url(&self.base_url, path);
        debug!("GET {}", url);
        let resp = self.http.get(&url).send()?;
        read_body(resp)
    }

    fn signed_request(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
    ) -> Result<String, ExchangeError> {
        debug!("{} {} {}", method, path, params.to_query_string());
        let query = signed_query(
            params,
            &self.credentials.api_secret,
            self.recv_window_ms,
            timestamp_millis(),
        );
        let url = format!("{}?{}", BinanceFuturesRest::url(&self.base_url, path), query);
        let resp = self
            .http
            .request(method, &url)
            .header(BinanceFuturesRest::API_KEY_HEADER, &self.credentials.api_key)
            .send()?;
        read_body(resp)
    }
}

fn read_body(resp: Response) -> Result<String, ExchangeError> {
    let status = resp.status();
    let body = resp.text()?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(classify_error(status.as_u16(), &body))
    }
}

impl FuturesExchange for BinanceFuturesClient {
    fn list_instruments(&self) -> Result<Vec<String>, ExchangeError> {
        let body = self.public_get(BinanceFuturesRest::EXCHANGE_INFO)?;
        parse_symbols(&body)
    }

    fn create_order(&self, params: &NewOrderParams) -> Result<OrderRecord, ExchangeError> {
        let body = self.signed_request(Method::POST, BinanceFuturesRest::ORDER, order_params(params))?;
        parse_order(&body)
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderRecord, ExchangeError> {
        let mut params = QueryParams::new();
        params.push("symbol", symbol).push("orderId", order_id);
        let body = self.signed_request(Method::GET, BinanceFuturesRest::ORDER, params)?;
        parse_order(&body)
    }

    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, ExchangeError> {
        let body = self.signed_request(Method::GET, BinanceFuturesRest::BALANCE, QueryParams::new())?;
        Ok(serde_json::from_str(&body)?)
    }
}
