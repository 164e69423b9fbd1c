use log::{error, info};
use rust_decimal::Decimal;

use crate::exchanges::FuturesExchange;
use crate::models::{
    ExchangeOrderType, NewOrderParams, OrderKind, OrderResult, Side, TimeInForce, ValidatedOrder,
};

/// Sends validated orders to the exchange. Exchange errors never escape:
/// each one is logged with its category and turned into `OrderResult::Failed`.
pub struct OrderDispatcher<E> {
    exchange: E,
}

impl<E: FuturesExchange> OrderDispatcher<E> {
    pub fn new(exchange: E) -> Self {
        Self { exchange }
    }

    pub fn dispatch(&self, order: &ValidatedOrder) -> OrderResult {
        let req = order.request();
        match req.kind {
            OrderKind::Market => self.place_market_order(&req.symbol, req.side, req.quantity),
            OrderKind::Limit { price } => {
                self.place_limit_order(&req.symbol, req.side, req.quantity, price)
            }
            OrderKind::StopLimit { price, stop_price } => {
                self.place_stop_limit_order(&req.symbol, req.side, req.quantity, price, stop_price)
            }
        }
    }

    pub fn place_market_order(&self, symbol: &str, side: Side, quantity: Decimal) -> OrderResult {
        info!("Placing market order: {} {} {}", side, quantity, symbol);
        self.submit(
            "market",
            NewOrderParams {
                symbol: symbol.to_string(),
                side,
                order_type: ExchangeOrderType::Market,
                quantity,
                price: None,
                stop_price: None,
                time_in_force: None,
            },
        )
    }

    pub fn place_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> OrderResult {
        info!("Placing limit order: {} {} {} @ {}", side, quantity, symbol, price);
        self.submit(
            "limit",
            NewOrderParams {
                symbol: symbol.to_string(),
                side,
                order_type: ExchangeOrderType::Limit,
                quantity,
                price: Some(price),
                stop_price: None,
                time_in_force: Some(TimeInForce::Gtc),
            },
        )
    }

    pub fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> OrderResult {
        info!(
            "Placing stop-limit order: {} {} {} @ {} (stop: {})",
            side, quantity, symbol, price, stop_price
        );
        self.submit(
            "stop-limit",
            NewOrderParams {
                symbol: symbol.to_string(),
                side,
                order_type: ExchangeOrderType::Stop,
                quantity,
                price: Some(price),
                stop_price: Some(stop_price),
                time_in_force: Some(TimeInForce::Gtc),
            },
        )
    }

    fn submit(&self, label: &str, params: NewOrderParams) -> OrderResult {
        match self.exchange.create_order(&params) {
            Ok(record) => {
                let body = serde_json::to_string(&record).unwrap_or_else(|_| format!("{:?}", record));
                info!("{} order placed successfully: {}", capitalize(label), body);
                OrderResult::Placed(record)
            }
            Err(err) => {
                error!("{} in {} order: {}", err.category(), label, err);
                OrderResult::Failed
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
