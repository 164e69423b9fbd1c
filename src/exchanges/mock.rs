//! In-memory exchange with scripted responses. Records every call so tests
//! can assert on what the dispatcher sent.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde_json::Map;

use crate::exchanges::{ExchangeError, FuturesExchange};
use crate::models::{AssetBalance, NewOrderParams, OrderRecord};

#[derive(Debug)]
pub struct MockExchange {
    instruments: RefCell<Result<Vec<String>, ExchangeError>>,
    balances: RefCell<Result<Vec<AssetBalance>, ExchangeError>>,
    order_responses: RefCell<VecDeque<Result<OrderRecord, ExchangeError>>>,
    status_responses: RefCell<VecDeque<Result<OrderRecord, ExchangeError>>>,
    created: RefCell<Vec<NewOrderParams>>,
    status_queries: RefCell<Vec<(String, i64)>>,
    instrument_calls: Cell<usize>,
    next_order_id: Cell<i64>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            instruments: RefCell::new(Ok(Vec::new())),
            balances: RefCell::new(Ok(Vec::new())),
            order_responses: RefCell::new(VecDeque::new()),
            status_responses: RefCell::new(VecDeque::new()),
            created: RefCell::new(Vec::new()),
            status_queries: RefCell::new(Vec::new()),
            instrument_calls: Cell::new(0),
            next_order_id: Cell::new(1),
        }
    }

    pub fn with_instruments(symbols: &[&str]) -> Self {
        let mock = Self::new();
        mock.set_instruments(symbols);
        mock
    }

    pub fn set_instruments(&self, symbols: &[&str]) {
        *self.instruments.borrow_mut() = Ok(symbols.iter().map(|s| s.to_string()).collect());
    }

    pub fn fail_instruments(&self, err: ExchangeError) {
        *self.instruments.borrow_mut() = Err(err);
    }

    pub fn set_balances(&self, balances: &[(&str, Decimal)]) {
        *self.balances.borrow_mut() = Ok(balances
            .iter()
            .map(|(asset, balance)| AssetBalance {
                asset: asset.to_string(),
                balance: *balance,
                available_balance: Some(*balance),
            })
            .collect());
    }

    pub fn fail_balances(&self, err: ExchangeError) {
        *self.balances.borrow_mut() = Err(err);
    }

    /// Queues the response of the next `create_order`. Without a queued
    /// response the order is accepted with status `NEW`.
    pub fn push_order_response(&self, response: Result<OrderRecord, ExchangeError>) {
        self.order_responses.borrow_mut().push_back(response);
    }

    pub fn push_status_response(&self, response: Result<OrderRecord, ExchangeError>) {
        self.status_responses.borrow_mut().push_back(response);
    }

    pub fn created_orders(&self) -> Vec<NewOrderParams> {
        self.created.borrow().clone()
    }

    pub fn status_queries(&self) -> Vec<(String, i64)> {
        self.status_queries.borrow().clone()
    }

    pub fn instrument_calls(&self) -> usize {
        self.instrument_calls.get()
    }

    fn accept(&self, params: &NewOrderParams) -> OrderRecord {
        let order_id = self.next_order_id.get();
        self.next_order_id.set(order_id + 1);
        OrderRecord {
            order_id,
            symbol: params.symbol.clone(),
            status: "NEW".to_string(),
            client_order_id: Some(format!("mock-{}", order_id)),
            side: Some(params.side),
            order_type: Some(params.order_type.as_str().to_string()),
            time_in_force: params.time_in_force.map(|t| t.as_str().to_string()),
            price: params.price,
            avg_price: Some(Decimal::ZERO),
            orig_qty: Some(params.quantity),
            executed_qty: Some(Decimal::ZERO),
            stop_price: params.stop_price,
            update_time: None,
            extra: Map::new(),
        }
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl FuturesExchange for MockExchange {
    fn list_instruments(&self) -> Result<Vec<String>, ExchangeError> {
        self.instrument_calls.set(self.instrument_calls.get() + 1);
        self.instruments.borrow().clone()
    }

    fn create_order(&self, params: &NewOrderParams) -> Result<OrderRecord, ExchangeError> {
        self.created.borrow_mut().push(params.clone());
        match self.order_responses.borrow_mut().pop_front() {
            Some(response) => response,
            None => Ok(self.accept(params)),
        }
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderRecord, ExchangeError> {
        self.status_queries
            .borrow_mut()
            .push((symbol.to_string(), order_id));
        match self.status_responses.borrow_mut().pop_front() {
            Some(response) => response,
            None => Err(ExchangeError::Order {
                code: -2013,
                msg: "Order does not exist.".to_string(),
            }),
        }
    }

    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, ExchangeError> {
        self.balances.borrow().clone()
    }
}
