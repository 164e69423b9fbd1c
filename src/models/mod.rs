//! Order, balance and validation types shared by the validator, the dispatcher
//! and the exchange client.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Quote asset the bot reports balances in.
pub const QUOTE_ASSET: &str = "USDT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Order type as the user names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    StopLimit,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP_LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP_LIMIT" => Ok(OrderType::StopLimit),
            other => Err(format!("unknown order type '{}'", other)),
        }
    }
}

/// Order type as Binance futures names it on the wire. A user-facing
/// stop-limit order is sent as `STOP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeOrderType {
    Market,
    Limit,
    Stop,
}

impl ExchangeOrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeOrderType::Market => "MARKET",
            ExchangeOrderType::Limit => "LIMIT",
            ExchangeOrderType::Stop => "STOP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled.
    #[serde(rename = "GTC")]
    Gtc,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// Price fields of an order, present exactly where the kind needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Market,
    Limit { price: Decimal },
    StopLimit { price: Decimal, stop_price: Decimal },
}

impl OrderKind {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderKind::Market => OrderType::Market,
            OrderKind::Limit { .. } => OrderType::Limit,
            OrderKind::StopLimit { .. } => OrderType::StopLimit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub kind: OrderKind,
}

/// Order input before validation, as typed on the command line or passed by
/// a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOrderRequest {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
}

impl RawOrderRequest {
    pub fn new(symbol: &str, side: &str, order_type: &str, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            order_type: order_type.to_string(),
            quantity,
            price: None,
            stop_price: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }
}

/// An order that passed every validation check. Only the validator can
/// build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder(OrderRequest);

impl ValidatedOrder {
    pub(crate) fn new(request: OrderRequest) -> Self {
        Self(request)
    }

    pub fn request(&self) -> &OrderRequest {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Invalid side: {0}. Must be one of [BUY, SELL]")]
    InvalidSide(String),
    #[error("Invalid order type: {0}. Must be one of [MARKET, LIMIT, STOP_LIMIT]")]
    InvalidOrderType(String),
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    #[error("Invalid symbol: {0}")]
    UnknownSymbol(String),
    #[error("Error validating symbol {symbol}: {reason}")]
    SymbolLookupFailed { symbol: String, reason: String },
    #[error("Limit price required for LIMIT and STOP_LIMIT orders")]
    MissingPrice,
    #[error("Limit price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    #[error("Stop price required for STOP_LIMIT orders")]
    MissingStopPrice,
    #[error("Stop price must be positive, got {0}")]
    NonPositiveStopPrice(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(ValidatedOrder),
    Rejected(ValidationFailure),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn reason(&self) -> String {
        match self {
            ValidationOutcome::Accepted(_) => "ok".to_string(),
            ValidationOutcome::Rejected(failure) => failure.to_string(),
        }
    }
}

/// Parameters of one `create_order` call, already mapped to exchange names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderParams {
    pub symbol: String,
    pub side: Side,
    pub order_type: ExchangeOrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
}

/// Order payload returned by the exchange. Fields the bot does not model are
/// kept in `extra` so the record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: i64,
    pub symbol: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_qty: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_qty: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    pub fn is_filled(&self) -> bool {
        self.status == "FILLED"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderResult {
    Placed(OrderRecord),
    Failed,
}

impl OrderResult {
    pub fn is_placed(&self) -> bool {
        matches!(self, OrderResult::Placed(_))
    }

    pub fn into_record(self) -> Option<OrderRecord> {
        match self {
            OrderResult::Placed(record) => Some(record),
            OrderResult::Failed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    pub asset: String,
    pub balance: Decimal,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_parse_is_case_insensitive() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" Sell ".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn test_order_type_parse() {
        assert_eq!("market".parse::<OrderType>().unwrap(), OrderType::Market);
        assert_eq!("Stop_Limit".parse::<OrderType>().unwrap(), OrderType::StopLimit);
        assert!("STOP".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_order_kind_type() {
        let kind = OrderKind::StopLimit {
            price: dec!(49000),
            stop_price: dec!(49500),
        };
        assert_eq!(kind.order_type(), OrderType::StopLimit);
        assert_eq!(OrderKind::Market.order_type().to_string(), "MARKET");
    }

    #[test]
    fn test_order_record_keeps_unknown_fields() {
        let body = r#"{
            "orderId": 4061285,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "clientOrderId": "x-abc",
            "side": "BUY",
            "type": "LIMIT",
            "timeInForce": "GTC",
            "price": "50000.00",
            "avgPrice": "0.00000",
            "origQty": "0.010",
            "executedQty": "0",
            "stopPrice": "0",
            "updateTime": 1700000000000,
            "reduceOnly": false,
            "positionSide": "BOTH"
        }"#;
        let record: OrderRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.order_id, 4061285);
        assert_eq!(record.side, Some(Side::Buy));
        assert_eq!(record.price, Some(dec!(50000)));
        assert_eq!(record.orig_qty, Some(dec!(0.01)));
        assert_eq!(record.extra.get("positionSide"), Some(&Value::from("BOTH")));
        assert!(!record.is_filled());
    }

    #[test]
    fn test_order_record_serializes_only_fields_sent() {
        let body = r#"{"orderId":12,"symbol":"BTCUSDT","status":"NEW","type":"MARKET","positionSide":"BOTH"}"#;
        let record: OrderRecord = serde_json::from_str(body).unwrap();
        let out = serde_json::to_string(&record).unwrap();
        assert!(!out.contains("null"), "{}", out);
        let back: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(body).unwrap());
    }

    #[test]
    fn test_validation_outcome_reason() {
        let rejected = ValidationOutcome::Rejected(ValidationFailure::InvalidSide("HOLD".into()));
        assert!(!rejected.is_valid());
        assert!(rejected.reason().contains("HOLD"));
    }
}
