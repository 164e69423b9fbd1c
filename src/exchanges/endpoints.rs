//! REST endpoints of Binance USDT-margined futures.

pub struct BinanceFuturesRest;

impl BinanceFuturesRest {
    pub const TESTNET_BASE: &'static str = "https://testnet.binancefuture.com";

    pub const EXCHANGE_INFO: &'static str = "/fapi/v1/exchangeInfo";
    pub const ORDER: &'static str = "/fapi/v1/order";
    pub const BALANCE: &'static str = "/fapi/v2/balance";

    pub const API_KEY_HEADER: &'static str = "X-MBX-APIKEY";
    pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

    pub fn url(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            BinanceFuturesRest::url("https://testnet.binancefuture.com/", BinanceFuturesRest::ORDER),
            "https://testnet.binancefuture.com/fapi/v1/order"
        );
    }
}
