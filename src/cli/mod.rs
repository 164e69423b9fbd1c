//! Command-line surface of `order_bot`: argument parsing, the confirmation
//! prompt and the human-readable report.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;

use crate::config::{ConfigOverrides, TradingConfig};
use crate::models::{OrderRecord, RawOrderRequest};

#[derive(Debug, Parser)]
#[command(name = "order_bot", about = "Binance Futures Trading Bot")]
pub struct Args {
    /// Trading symbol (e.g., BTCUSDT), defaults to `trading.default_symbol`
    #[arg(long)]
    pub symbol: Option<String>,

    /// Order side
    #[arg(long, value_parser = ["BUY", "SELL"], ignore_case = true)]
    pub side: String,

    /// Order quantity, defaults to `trading.default_quantity`
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<Decimal>,

    /// Order type
    #[arg(long = "order-type", value_parser = ["MARKET", "LIMIT", "STOP_LIMIT"], ignore_case = true)]
    pub order_type: String,

    /// Limit price (for LIMIT and STOP_LIMIT orders)
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<Decimal>,

    /// Stop price (for STOP_LIMIT orders)
    #[arg(long = "stop-price", allow_negative_numbers = true)]
    pub stop_price: Option<Decimal>,

    /// Binance API key (optional if set in the environment)
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Binance API secret (optional if set in the environment)
    #[arg(long = "api-secret")]
    pub api_secret: Option<String>,

    /// REST endpoint, defaults to the futures testnet
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Args {
    pub fn raw_order(&self, defaults: &TradingConfig) -> RawOrderRequest {
        RawOrderRequest {
            symbol: self
                .symbol
                .clone()
                .unwrap_or_else(|| defaults.default_symbol.clone()),
            side: self.side.clone(),
            order_type: self.order_type.clone(),
            quantity: self.quantity.unwrap_or(defaults.default_quantity),
            price: self.price,
            stop_price: self.stop_price,
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

pub fn render_order_summary(raw: &RawOrderRequest) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nPlacing {} order:\n", raw.order_type.to_uppercase()));
    out.push_str(&format!("Symbol: {}\n", raw.symbol));
    out.push_str(&format!("Side: {}\n", raw.side.to_uppercase()));
    out.push_str(&format!("Quantity: {}\n", raw.quantity));
    if let Some(price) = raw.price {
        out.push_str(&format!("Price: {}\n", price));
    }
    if let Some(stop) = raw.stop_price {
        out.push_str(&format!("Stop Price: {}\n", stop));
    }
    out
}

/// Asks for confirmation; only `y` or `Y` confirms. End of input cancels.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "\nConfirm order? (y/n): ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

pub fn render_placed(record: &OrderRecord) -> String {
    let mut out = String::from("\n✅ Order placed successfully!\n");
    out.push_str(&format!("Order ID: {}\n", record.order_id));
    out.push_str(&format!("Status: {}\n", record.status));
    if let Some(price) = non_zero(record.price) {
        out.push_str(&format!("Price: {}\n", price));
    }
    if let Some(stop) = non_zero(record.stop_price) {
        out.push_str(&format!("Stop Price: {}\n", stop));
    }
    out
}

pub fn render_status(record: &OrderRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Current Status: {}\n", record.status));
    if record.is_filled() {
        if let Some(qty) = record.executed_qty {
            out.push_str(&format!("Executed Quantity: {}\n", qty));
        }
        if let Some(avg) = non_zero(record.avg_price) {
            out.push_str(&format!("Average Price: {}\n", avg));
        }
    }
    out
}

pub const FAILURE_MESSAGE: &str = "\n❌ Failed to place order. Check logs for details.";

// Binance reports absent prices as "0".
fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    #[test]
    fn test_command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_stop_limit_flags() {
        let args = Args::try_parse_from([
            "order_bot",
            "--symbol",
            "BTCUSDT",
            "--side",
            "SELL",
            "--quantity",
            "0.01",
            "--order-type",
            "STOP_LIMIT",
            "--price",
            "49000",
            "--stop-price",
            "49500",
            "--yes",
        ])
        .unwrap();
        let raw = args.raw_order(&TradingConfig::default());
        assert_eq!(raw.symbol, "BTCUSDT");
        assert_eq!(raw.order_type, "STOP_LIMIT");
        assert_eq!(raw.quantity, dec!(0.01));
        assert_eq!(raw.price, Some(dec!(49000)));
        assert_eq!(raw.stop_price, Some(dec!(49500)));
        assert!(args.yes);
        assert!(args.overrides().api_key.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_side() {
        let res = Args::try_parse_from([
            "order_bot", "--symbol", "BTCUSDT", "--side", "HOLD", "--quantity", "1", "--order-type",
            "MARKET",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_quantity_reaches_validation() {
        let args = Args::try_parse_from([
            "order_bot", "--symbol", "BTCUSDT", "--side", "buy", "--quantity", "-1", "--order-type",
            "market",
        ])
        .unwrap();
        assert_eq!(args.quantity, Some(dec!(-1)));
    }

    #[test]
    fn test_symbol_and_quantity_fall_back_to_config() {
        let args =
            Args::try_parse_from(["order_bot", "--side", "BUY", "--order-type", "MARKET"]).unwrap();
        let trading = TradingConfig {
            default_symbol: "ETHUSDT".to_string(),
            default_quantity: dec!(0.5),
            ..Default::default()
        };
        let raw = args.raw_order(&trading);
        assert_eq!(raw.symbol, "ETHUSDT");
        assert_eq!(raw.quantity, dec!(0.5));
    }

    #[test]
    fn test_confirm() {
        let mut out = Vec::new();
        assert!(confirm(&mut Cursor::new("y\n"), &mut out).unwrap());
        assert!(confirm(&mut Cursor::new("Y\n"), &mut out).unwrap());
        assert!(!confirm(&mut Cursor::new("yes\n"), &mut out).unwrap());
        assert!(!confirm(&mut Cursor::new(""), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("Confirm order? (y/n)"));
    }

    #[test]
    fn test_rendered_reports_are_exact() {
        let raw = RawOrderRequest::new("BTCUSDT", "sell", "limit", dec!(0.01)).with_price(dec!(50000));
        assert_eq!(
            render_order_summary(&raw),
            "\nPlacing LIMIT order:\nSymbol: BTCUSDT\nSide: SELL\nQuantity: 0.01\nPrice: 50000\n"
        );

        let record: OrderRecord = serde_json::from_str(
            r#"{"orderId": 31, "symbol": "BTCUSDT", "status": "NEW", "price": "50000", "stopPrice": "0"}"#,
        )
        .unwrap();
        assert_eq!(
            render_placed(&record),
            "\n✅ Order placed successfully!\nOrder ID: 31\nStatus: NEW\nPrice: 50000\n"
        );
        assert_eq!(render_status(&record), "Current Status: NEW\n");
    }

    #[test]
    fn test_order_summary_lists_only_present_prices() {
        let raw = RawOrderRequest::new("BTCUSDT", "BUY", "MARKET", dec!(0.01));
        let text = render_order_summary(&raw);
        assert!(text.contains("Placing MARKET order:"));
        assert!(!text.contains("Price"));
    }

    #[test]
    fn test_render_status_for_filled_order() {
        let record: OrderRecord = serde_json::from_str(
            r#"{"orderId": 7, "symbol": "BTCUSDT", "status": "FILLED",
                "executedQty": "0.010", "avgPrice": "50012.3", "price": "0"}"#,
        )
        .unwrap();
        let text = render_status(&record);
        assert!(text.contains("Current Status: FILLED"));
        assert!(text.contains("Executed Quantity: 0.010"));
        assert!(text.contains("Average Price: 50012.3"));
        assert!(!render_placed(&record).contains("Price:"));
    }
}
