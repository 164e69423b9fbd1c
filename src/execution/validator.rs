use log::{debug, error};
use rust_decimal::Decimal;

use crate::exchanges::FuturesExchange;
use crate::models::{
    OrderKind, OrderRequest, OrderType, RawOrderRequest, Side, ValidatedOrder, ValidationFailure,
    ValidationOutcome,
};

/// Local checks run before anything is sent to the exchange.
///
/// Checks run in a fixed order and stop at the first failure: side, order
/// type, quantity, symbol listing, limit price, stop price. The symbol check
/// asks the exchange for its instrument list on every call.
pub struct Validator<E> {
    exchange: E,
}

impl<E: FuturesExchange> Validator<E> {
    pub fn new(exchange: E) -> Self {
        Self { exchange }
    }

    pub fn validate(&self, raw: &RawOrderRequest) -> ValidationOutcome {
        match self.check(raw) {
            Ok(request) => ValidationOutcome::Accepted(ValidatedOrder::new(request)),
            Err(failure) => {
                error!("{}", failure);
                ValidationOutcome::Rejected(failure)
            }
        }
    }

    fn check(&self, raw: &RawOrderRequest) -> Result<OrderRequest, ValidationFailure> {
        let side: Side = raw
            .side
            .parse()
            .map_err(|_| ValidationFailure::InvalidSide(raw.side.clone()))?;

        let order_type: OrderType = raw
            .order_type
            .parse()
            .map_err(|_| ValidationFailure::InvalidOrderType(raw.order_type.clone()))?;

        if raw.quantity <= Decimal::ZERO {
            return Err(ValidationFailure::NonPositiveQuantity(raw.quantity));
        }

        self.check_symbol(&raw.symbol)?;

        let kind = match order_type {
            OrderType::Market => {
                if raw.price.is_some() || raw.stop_price.is_some() {
                    debug!("Ignoring price fields on MARKET order for {}", raw.symbol);
                }
                OrderKind::Market
            }
            OrderType::Limit => OrderKind::Limit {
                price: limit_price(raw.price)?,
            },
            OrderType::StopLimit => OrderKind::StopLimit {
                price: limit_price(raw.price)?,
                stop_price: stop_price(raw.stop_price)?,
            },
        };

        Ok(OrderRequest {
            symbol: raw.symbol.clone(),
            side,
            quantity: raw.quantity,
            kind,
        })
    }

    fn check_symbol(&self, symbol: &str) -> Result<(), ValidationFailure> {
        let symbols = self
            .exchange
            .list_instruments()
            .map_err(|err| ValidationFailure::SymbolLookupFailed {
                symbol: symbol.to_string(),
                reason: err.to_string(),
            })?;
        if symbols.iter().any(|s| s == symbol) {
            Ok(())
        } else {
            Err(ValidationFailure::UnknownSymbol(symbol.to_string()))
        }
    }
}

fn limit_price(price: Option<Decimal>) -> Result<Decimal, ValidationFailure> {
    match price {
        None => Err(ValidationFailure::MissingPrice),
        Some(p) if p <= Decimal::ZERO => Err(ValidationFailure::NonPositivePrice(p)),
        Some(p) => Ok(p),
    }
}

fn stop_price(price: Option<Decimal>) -> Result<Decimal, ValidationFailure> {
    match price {
        None => Err(ValidationFailure::MissingStopPrice),
        Some(p) if p <= Decimal::ZERO => Err(ValidationFailure::NonPositiveStopPrice(p)),
        Some(p) => Ok(p),
    }
}
