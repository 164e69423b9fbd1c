use std::io;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use futures_order_bot::cli::{self, Args};
use futures_order_bot::config::BotConfig;
use futures_order_bot::exchanges::BinanceFuturesClient;
use futures_order_bot::execution::TradingBot;
use futures_order_bot::models::OrderResult;
use futures_order_bot::utils::logging::init_logging;

fn main() -> Result<()> {
    let args = Args::parse();

    let config = BotConfig::load(args.config.as_deref(), &args.overrides())
        .context("failed to load configuration")?;
    init_logging(&config.logging)?;

    let client = BinanceFuturesClient::from_config(&config.exchange)
        .context("Failed to initialize trading bot")?;
    log::info!("Using {}", client.base_url());
    let bot = TradingBot::new(client);

    let balance = bot.get_account_balance();
    println!("Current USDT Balance: {}", balance);

    let raw = args.raw_order(&config.trading);
    print!("{}", cli::render_order_summary(&raw));

    if !args.yes {
        let stdin = io::stdin();
        let confirmed = cli::confirm(&mut stdin.lock(), &mut io::stdout())
            .context("failed to read confirmation")?;
        if !confirmed {
            println!("Order cancelled");
            return Ok(());
        }
    }

    match bot.place_order(&raw) {
        OrderResult::Placed(record) => {
            print!("{}", cli::render_placed(&record));

            println!("\nChecking order status...");
            thread::sleep(Duration::from_secs(config.trading.status_check_delay_secs));
            if let Some(status) = bot.get_order_status(&record.symbol, record.order_id) {
                print!("{}", cli::render_status(&status));
            }
        }
        OrderResult::Failed => println!("{}", cli::FAILURE_MESSAGE),
    }

    Ok(())
}
