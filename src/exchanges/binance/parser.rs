use serde::Deserialize;

use crate::exchanges::ExchangeError;
use crate::models::OrderRecord;

const BODY_PREVIEW_LEN: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
}

/// Error body Binance returns with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

pub fn parse_symbols(body: &str) -> Result<Vec<String>, ExchangeError> {
    let info: ExchangeInfo = serde_json::from_str(body)?;
    Ok(info.symbols.into_iter().map(|s| s.symbol).collect())
}

/// Parses an order reply. On failure the error keeps the start of the raw
/// body, since a 2xx reply means the order may be live on the exchange.
pub fn parse_order(body: &str) -> Result<OrderRecord, ExchangeError> {
    serde_json::from_str(body).map_err(|err| {
        ExchangeError::Decode(format!("{} in order reply: {}", err, truncate(body, BODY_PREVIEW_LEN)))
    })
}

/// Error codes that reject an order on its merits rather than the request
/// as a whole (filters, precision, margin, trigger conditions).
pub fn is_order_rejection(code: i64) -> bool {
    matches!(code, -1013 | -1111 | -1116 | -1117 | -2010 | -2011 | -2013)
        || (-2027..=-2019).contains(&code)
        || (-4999..=-4000).contains(&code)
}

/// Turns a non-success response into the matching `ExchangeError`.
pub fn classify_error(status: u16, body: &str) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) if is_order_rejection(err.code) => ExchangeError::Order {
            code: err.code,
            msg: err.msg,
        },
        Ok(err) => ExchangeError::Api {
            status,
            code: err.code,
            msg: err.msg,
        },
        Err(_) => ExchangeError::Api {
            status,
            code: 0,
            msg: truncate(body, BODY_PREVIEW_LEN),
        },
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
