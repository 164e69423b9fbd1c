//! Request signing for private Binance endpoints.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

use crate::models::NewOrderParams;

type HmacSha256 = Hmac<Sha256>;

/// Ordered `key=value` pairs rendered as a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_decimal(&mut self, key: &str, value: Decimal) -> &mut Self {
        self.push(key, format_decimal(value))
    }

    pub fn push_opt_decimal(&mut self, key: &str, value: Option<Decimal>) -> &mut Self {
        if let Some(v) = value {
            self.push_decimal(key, v);
        }
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Values are plain ASCII tokens (symbols, enums, decimals, integers), so
    /// no percent-encoding is applied.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Decimal without trailing zeros or exponent, e.g. `0.0100` -> `0.01`.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parameters of `POST /fapi/v1/order`.
pub fn order_params(params: &NewOrderParams) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push("symbol", &params.symbol)
        .push("side", params.side.as_str())
        .push("type", params.order_type.as_str())
        .push_decimal("quantity", params.quantity)
        .push_opt_decimal("price", params.price)
        .push_opt_decimal("stopPrice", params.stop_price);
    if let Some(tif) = params.time_in_force {
        query.push("timeInForce", tif.as_str());
    }
    query
}

/// Hex encoded HMAC-SHA256 of `payload` keyed with `secret`.
pub fn sign(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(payload.as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

/// Appends `recvWindow` and `timestamp`, then the signature over everything
/// before it. Returns the final query string.
pub fn signed_query(
    mut params: QueryParams,
    secret: &str,
    recv_window_ms: u64,
    timestamp_ms: i64,
) -> String {
    params
        .push("recvWindow", recv_window_ms)
        .push("timestamp", timestamp_ms);
    let query = params.to_query_string();
    let signature = sign(&query, secret);
    format!("{}&signature={}", query, signature)
}
