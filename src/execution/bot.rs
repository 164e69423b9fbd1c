use log::{debug, error, info, warn};
use rust_decimal::Decimal;

use crate::exchanges::FuturesExchange;
use crate::execution::{OrderDispatcher, Validator};
use crate::models::{OrderRecord, OrderResult, QUOTE_ASSET, RawOrderRequest, ValidationOutcome};

/// Entry point for callers: owns the exchange handle and guarantees that an
/// order is only dispatched after it validated.
pub struct TradingBot<E> {
    exchange: E,
}

impl<E: FuturesExchange> TradingBot<E> {
    pub fn new(exchange: E) -> Self {
        info!("Trading bot initialized successfully");
        Self { exchange }
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    pub fn validator(&self) -> Validator<&E> {
        Validator::new(&self.exchange)
    }

    pub fn dispatcher(&self) -> OrderDispatcher<&E> {
        OrderDispatcher::new(&self.exchange)
    }

    pub fn validate(&self, raw: &RawOrderRequest) -> ValidationOutcome {
        self.validator().validate(raw)
    }

    /// Validates `raw` and, if it passes, sends it. Never panics or returns an
    /// error: every failure ends up in the log and as `OrderResult::Failed`.
    pub fn place_order(&self, raw: &RawOrderRequest) -> OrderResult {
        match self.validate(raw) {
            ValidationOutcome::Accepted(order) => {
                let req = order.request();
                debug!("Validated {} order for {}", req.kind.order_type(), req.symbol);
                self.dispatcher().dispatch(&order)
            }
            ValidationOutcome::Rejected(_) => OrderResult::Failed,
        }
    }

    pub fn get_order_status(&self, symbol: &str, order_id: i64) -> Option<OrderRecord> {
        match self.exchange.get_order(symbol, order_id) {
            Ok(record) => {
                info!(
                    "Order status: {} {} {} (executed {})",
                    record.symbol,
                    record.order_id,
                    record.status,
                    record.executed_qty.unwrap_or_default()
                );
                Some(record)
            }
            Err(err) => {
                error!("Error getting order status ({}): {}", err.category(), err);
                None
            }
        }
    }

    /// USDT wallet balance, or zero when the exchange has no USDT entry or
    /// the lookup fails.
    pub fn get_account_balance(&self) -> Decimal {
        match self.exchange.get_account_balances() {
            Ok(balances) => match balances.iter().find(|b| b.asset == QUOTE_ASSET) {
                Some(entry) => {
                    info!("{} Balance: {}", QUOTE_ASSET, entry.balance);
                    entry.balance
                }
                None => {
                    warn!("No {} entry in account balances", QUOTE_ASSET);
                    Decimal::ZERO
                }
            },
            Err(err) => {
                error!("Error getting balance ({}): {}", err.category(), err);
                Decimal::ZERO
            }
        }
    }
}
